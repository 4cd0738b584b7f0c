//! Page fixtures and a mock IMDb server for tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACTOR_PAGE: &str = r#"<html><body>
<div id="filmography">
  <div id="filmo-head-actor">Actor (7 credits)</div>
  <div class="filmo-category-section">
    <div class="filmo-row odd" id="actor-tt1">
      <span class="year_column">&nbsp;2001</span>
      <b><a href="/title/tt1/?ref_=nm_flmg_act_1">First Movie</a></b>
    </div>
    <div class="filmo-row even" id="actor-tt2">
      <span class="year_column">&nbsp;1999</span>
      <b><a href="/title/tt2/?ref_=nm_flmg_act_2">Second Movie</a></b>
      <br/>Himself
    </div>
    <div class="filmo-row odd" id="actor-tt3">
      <span class="year_column">&nbsp;1995-1998</span>
      <b><a href="/title/tt3/?ref_=nm_flmg_act_3">Some Show</a></b> (TV Series)
      <div class="filmo-episodes"><a href="/title/tt31/">Pilot</a></div>
    </div>
    <div class="filmo-row even" id="actor-tt4">
      <span class="year_column">&nbsp;</span>
      <b><a href="/title/tt4/?ref_=nm_flmg_act_4">Announced Movie</a></b>
    </div>
    <div class="filmo-row odd" id="actress-tt5">
      <span class="year_column">&nbsp;1990</span>
      <b><a href="/title/tt5/">Tiny Film</a></b> (Short)
    </div>
    <div class="filmo-row even" id="actress-tt6">
      <span class="year_column">&nbsp;1988</span>
      <b><a href="/title/tt6/">Early Movie</a></b>
    </div>
  </div>
  <div id="filmo-head-producer">Producer (1 credit)</div>
  <div class="filmo-category-section">
    <div class="filmo-row odd" id="producer-tt7">
      <span class="year_column">&nbsp;2010</span>
      <b><a href="/title/tt7/">Produced Movie</a></b>
    </div>
  </div>
</div>
</body></html>"#;

pub const MOVIE_PAGE: &str = r#"<html><body>
<h1>First Movie</h1>
<span data-testid="plot-xl">Two strangers meet on a train.</span>
<a class="ipc-metadata-list-item__icon-link" aria-label="See full cast and crew" href="/title/tt1/fullcredits/?ref_=tt_cl_sm">Cast</a>
</body></html>"#;

pub const CAST_PAGE: &str = r#"<html><body>
<table class="cast_list">
  <tr class="odd">
    <td class="primary_photo"><a href="/name/nm1/"><img alt="First Actor"/></a></td>
    <td><a href="/name/nm1/?ref_=ttfc_fc_cl_t1"> First Actor
</a></td>
  </tr>
  <tr class="even">
    <td class="primary_photo"><a href="/name/nm2/"><img alt="Second Actor"/></a></td>
    <td><a href="/name/nm2/?ref_=ttfc_fc_cl_t2">Second Actor</a></td>
  </tr>
  <tr class="odd">
    <td class="primary_photo"><a href="/name/nm3/"><img alt="Third Actor"/></a></td>
    <td><a href="/name/nm3/?ref_=ttfc_fc_cl_t3">Third Actor</a></td>
  </tr>
</table>
</body></html>"#;

/// Mount canned pages on a fresh mock server
///
/// Unmatched paths answer 404. Query strings are ignored when routing. The
/// server stops when the returned handle is dropped.
pub async fn serve(pages: &[(&str, u16, &str)]) -> MockServer {
    let server = MockServer::start().await;

    for (page, status, body) in pages {
        Mock::given(method("GET"))
            .and(path(*page))
            .respond_with(ResponseTemplate::new(*status).set_body_raw(*body, "text/html"))
            .mount(&server)
            .await;
    }

    server
}
