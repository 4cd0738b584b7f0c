//! Output formatting utilities

use costar_core::PairOutcome;
use costar_imdb::{Credit, MovieDescription};
use costar_storage::csv::{csv_escape, render_csv};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Render pair outcomes, one line per pair in table form
pub fn render_outcomes(outcomes: &[PairOutcome], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&outcomes),
        OutputFormat::Csv => Ok(render_csv(outcomes)),
        OutputFormat::Table => {
            let width = outcomes
                .iter()
                .map(|o| o.pair().to_string().len())
                .max()
                .unwrap_or(0);

            let lines: Vec<String> = outcomes
                .iter()
                .map(|outcome| match outcome {
                    PairOutcome::Found(result) => {
                        format!("{:<width$}  {}", result.pair().to_string(), result.distance)
                    }
                    PairOutcome::Failed(failure) => format!(
                        "{:<width$}  error: {}",
                        failure.pair().to_string(),
                        failure.message
                    ),
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Render neighbor credits
pub fn render_credits(credits: &[Credit], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&credits),
        OutputFormat::Csv => {
            let mut out = String::from("id,name\n");
            for credit in credits {
                out.push_str(&format!(
                    "{},{}\n",
                    csv_escape(credit.id.as_str()),
                    csv_escape(&credit.name)
                ));
            }
            Ok(out)
        }
        OutputFormat::Table => Ok(credits
            .iter()
            .map(|credit| {
                if credit.name.is_empty() {
                    credit.id.to_string()
                } else {
                    format!("{:<12} {}", credit.id.as_str(), credit.name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render movie descriptions
pub fn render_descriptions(
    descriptions: &[MovieDescription],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&descriptions),
        OutputFormat::Csv => {
            let mut out = String::from("id,title,description\n");
            for d in descriptions {
                out.push_str(&format!(
                    "{},{},{}\n",
                    csv_escape(d.id.as_str()),
                    csv_escape(&d.title),
                    csv_escape(&d.description)
                ));
            }
            Ok(out)
        }
        OutputFormat::Table => Ok(descriptions
            .iter()
            .map(|d| format!("{} ({})\n  {}", d.title, d.id, d.description))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costar_core::{Distance, DistanceResult, Pair, PairFailure};

    fn outcomes() -> Vec<PairOutcome> {
        vec![
            PairOutcome::Found(DistanceResult::new(Pair::new("nm1", "nm2"), Distance::Hops(2))),
            PairOutcome::Found(DistanceResult::new(Pair::new("nm1", "nm3"), Distance::Infinite)),
            PairOutcome::Failed(PairFailure::new(&Pair::new("nm2", "nm3"), 1, "Node not found: nm3")),
        ]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Table);
    }

    #[test]
    fn test_outcome_table() {
        let table = render_outcomes(&outcomes(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "nm1 <-> nm2  2");
        assert_eq!(lines[1], "nm1 <-> nm3  inf");
        assert_eq!(lines[2], "nm2 <-> nm3  error: Node not found: nm3");
    }

    #[test]
    fn test_outcome_json_and_csv() {
        let json = render_outcomes(&outcomes(), OutputFormat::Json).unwrap();
        let parsed: Vec<PairOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcomes());

        let csv = render_outcomes(&outcomes(), OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("actor_from,actor_to,distance,error"));
    }

    #[test]
    fn test_credits() {
        let credits = vec![
            Credit {
                id: "tt1".into(),
                name: "First Movie".to_string(),
            },
            Credit {
                id: "tt2".into(),
                name: String::new(),
            },
        ];

        let table = render_credits(&credits, OutputFormat::Table).unwrap();
        assert_eq!(table, "tt1          First Movie\ntt2");

        let csv = render_credits(&credits, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "id,name\ntt1,First Movie\ntt2,\n");
    }
}
