use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::Settings;
use crate::domain::model::CpiResult;
use crate::domain::ports::CpiProvider;
use crate::utils::error::{KpaError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetches the Consumer Price Index from the GENESIS API.
///
/// One `resolve` call is one POST to `/data/table` followed by a scan of the
/// returned text table for the October row of the lookup year. No cache, no
/// retries; every failure is terminal for that call.
#[derive(Debug)]
pub struct CpiResolver {
    client: Client,
    base_url: String,
    table_code: String,
    language: String,
    username: String,
    password: String,
}

/// GENESIS wraps the table in a JSON envelope; the table itself is a
/// semicolon-delimited text blob under `Object.Content`.
#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(rename = "Status")]
    status: Option<TableStatus>,
    #[serde(rename = "Object")]
    object: Option<TableObject>,
}

#[derive(Debug, Deserialize)]
struct TableStatus {
    #[serde(rename = "Code")]
    code: Option<i64>,
    #[serde(rename = "Content")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableObject {
    #[serde(rename = "Content")]
    content: Option<String>,
}

impl CpiResolver {
    pub fn new(
        base_url: String,
        table_code: String,
        language: String,
        username: String,
        password: String,
    ) -> Result<Self> {
        if username.is_empty() || password.is_empty() {
            return Err(KpaError::ConfigError {
                message: "GENESIS credentials required: set GENESIS_USERNAME and GENESIS_PASSWORD"
                    .to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            table_code,
            language,
            username,
            password,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.genesis_base_url.clone(),
            settings.genesis_cpi_code.clone(),
            settings.genesis_language.clone(),
            settings.genesis_username.clone(),
            settings.genesis_password.clone(),
        )
    }

    /// Full form body for `/data/table`. GENESIS rejects requests with
    /// absent parameters, so every field is sent even when empty.
    fn table_form_data(&self, lookup_year: i32) -> Vec<(&'static str, String)> {
        let year_str = lookup_year.to_string();
        vec![
            ("regionalkey", String::new()),
            ("compress", "false".to_string()),
            ("name", self.table_code.clone()),
            ("area", "free".to_string()),
            ("timeslices", String::new()),
            ("classifyingkey1", String::new()),
            ("classifyingkey2", String::new()),
            ("classifyingkey3", String::new()),
            ("classifyingkey4", String::new()),
            ("classifyingkey5", String::new()),
            ("stand", "01.01.1970 01:00".to_string()),
            ("classifyingvariable1", String::new()),
            ("classifyingvariable2", String::new()),
            ("language", self.language.clone()),
            ("endyear", year_str.clone()),
            ("classifyingvariable3", String::new()),
            ("transpose", "false".to_string()),
            ("classifyingvariable4", String::new()),
            ("contents", String::new()),
            ("classifyingvariable5", String::new()),
            ("regionalvariable", String::new()),
            ("job", "false".to_string()),
            ("startyear", year_str),
        ]
    }

    async fn fetch_table(&self, lookup_year: i32) -> Result<TableResponse> {
        let url = format!("{}/data/table", self.base_url);
        tracing::debug!("Requesting GENESIS table {} for {}", self.table_code, lookup_year);

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json; charset=UTF-8")
            .header("username", &self.username)
            .header("password", &self.password)
            .form(&self.table_form_data(lookup_year))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("GENESIS response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(KpaError::DataSource {
                message: format!("GENESIS table request failed: HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| KpaError::DataSource {
            message: format!("GENESIS table returned invalid JSON: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl CpiProvider for CpiResolver {
    async fn resolve(&self, target_year: i32) -> Result<CpiResult> {
        if target_year <= 1 {
            return Err(KpaError::InvalidConfigValueError {
                field: "target_year".to_string(),
                value: target_year.to_string(),
                reason: "Target year must be greater than 1".to_string(),
            });
        }
        let lookup_year = target_year - 1;

        let data = self.fetch_table(lookup_year).await?;

        let status_code = data.status.as_ref().and_then(|s| s.code);
        if status_code != Some(0) {
            let detail = data
                .status
                .and_then(|s| s.content)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(KpaError::DataSource {
                message: format!("GENESIS table error: {}", detail),
            });
        }

        let content = data
            .object
            .and_then(|o| o.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| KpaError::DataSource {
                message: "GENESIS table response has no Object.Content".to_string(),
            })?;

        let result = parse_cpi_from_content(&content, lookup_year)?;
        tracing::info!(
            "Resolved CPI {} for October {}",
            result.value,
            result.source_year
        );
        Ok(result)
    }
}

/// Scan the table text for the `<lookup_year> ; October ; <value> ; ...` row.
///
/// Compatibility assumption: GENESIS renders the month as an English or
/// German literal (`October`/`Oktober`) regardless of request language, and
/// keeps the year;month;value column order. The fixture tests below pin this
/// shape so a provider-side format change fails loudly.
fn parse_cpi_from_content(content: &str, lookup_year: i32) -> Result<CpiResult> {
    let year_str = lookup_year.to_string();

    for line in content.lines() {
        let stripped = line.trim();
        // Everything after the footer separator is metadata, not rows.
        if stripped == "__________" {
            break;
        }
        if stripped.is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(';').map(str::trim).collect();
        if cells.len() < 3 {
            continue;
        }
        if cells[0] != year_str {
            continue;
        }
        let month = cells[1].to_lowercase();
        if month != "october" && month != "oktober" {
            continue;
        }

        // First matching row decides; GENESIS uses a comma decimal
        // separator in German output.
        let value: f64 = cells[2].replace(',', ".").parse().map_err(|_| {
            KpaError::CpiParse {
                message: format!(
                    "CPI value {:?} in the October {} row is not numeric",
                    cells[2], lookup_year
                ),
            }
        })?;

        if !(value > 0.0 && value <= 1000.0) {
            return Err(KpaError::CpiParse {
                message: format!(
                    "CPI value {} for October {} is outside the plausible range (0, 1000]",
                    value, lookup_year
                ),
            });
        }

        return Ok(CpiResult {
            value,
            source_year: lookup_year,
        });
    }

    Err(KpaError::CpiNotFound(lookup_year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_english_october_row() {
        let content = "2022 ; October ; 117.3 ; foo";
        let result = parse_cpi_from_content(content, 2022).unwrap();
        assert_eq!(result.value, 117.3);
        assert_eq!(result.source_year, 2022);
    }

    #[test]
    fn test_parses_german_oktober_row_with_comma_decimal() {
        let content = "2022;Oktober;117,3;x";
        let result = parse_cpi_from_content(content, 2022).unwrap();
        assert_eq!(result.value, 117.3);
    }

    #[test]
    fn test_month_match_is_case_insensitive() {
        let content = "2022 ; OCTOBER ; 117.3 ; foo";
        assert!(parse_cpi_from_content(content, 2022).is_ok());
    }

    #[test]
    fn test_skips_other_months_and_years() {
        let content = "\
2021 ; October ; 110.7 ; a
2022 ; September ; 117.0 ; a
2022 ; October ; 117.3 ; a
2022 ; November ; 117.4 ; a";
        let result = parse_cpi_from_content(content, 2022).unwrap();
        assert_eq!(result.value, 117.3);
    }

    #[test]
    fn test_first_matching_row_wins() {
        let content = "\
2022 ; October ; 117.3 ; first
2022 ; October ; 999.9 ; duplicate";
        let result = parse_cpi_from_content(content, 2022).unwrap();
        assert_eq!(result.value, 117.3);
    }

    #[test]
    fn test_stops_scanning_at_footer_separator() {
        let content = "\
2022 ; September ; 117.0 ; a
__________
2022 ; October ; 117.3 ; in the footer";
        let err = parse_cpi_from_content(content, 2022).unwrap_err();
        assert!(matches!(err, KpaError::CpiNotFound(2022)));
    }

    #[test]
    fn test_missing_row_is_not_found() {
        let content = "2021 ; October ; 110.7 ; a";
        let err = parse_cpi_from_content(content, 2022).unwrap_err();
        assert!(matches!(err, KpaError::CpiNotFound(2022)));
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let content = "2022 ; October ; N/A ; a";
        let err = parse_cpi_from_content(content, 2022).unwrap_err();
        assert!(matches!(err, KpaError::CpiParse { .. }));
    }

    #[test]
    fn test_out_of_range_value_is_parse_error() {
        let content = "2022 ; October ; 12345.6 ; a";
        let err = parse_cpi_from_content(content, 2022).unwrap_err();
        assert!(matches!(err, KpaError::CpiParse { .. }));
    }

    #[test]
    fn test_short_rows_are_ignored() {
        let content = "\
2022
2022 ; October
2022 ; October ; 117.3";
        let result = parse_cpi_from_content(content, 2022).unwrap();
        assert_eq!(result.value, 117.3);
    }

    #[test]
    fn test_resolver_rejects_empty_credentials() {
        let err = CpiResolver::new(
            "https://example.com".to_string(),
            "61111-0002".to_string(),
            "en".to_string(),
            String::new(),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, KpaError::ConfigError { .. }));
    }
}
