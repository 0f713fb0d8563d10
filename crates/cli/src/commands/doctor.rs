use petworld_core::config::{AppConfig, LlmProvider, LoadOptions};
use petworld_db::{connect_with_settings, CatalogSeed};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm_settings(&config));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["llm_settings", "database_connectivity", "catalog_readiness"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    summarize(checks)
}

fn summarize(checks: Vec<DoctorCheck>) -> DoctorReport {
    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_settings(config: &AppConfig) -> DoctorCheck {
    let credential = match (config.llm.provider, config.llm.api_key.is_some()) {
        (_, true) => "api key present",
        (LlmProvider::Ollama, false) => "no api key (not required for ollama)",
        (LlmProvider::OpenAi, false) => "api key missing",
    };
    DoctorCheck {
        name: "llm_settings",
        status: CheckStatus::Pass,
        details: format!(
            "model `{}` at {}/chat/completions, {credential}, up to {} refinement rounds",
            config.llm.model,
            config.llm.effective_base_url(),
            config.refinement.max_iterations
        ),
    }
}

fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    DoctorCheck {
                        name: "catalog_readiness",
                        status: CheckStatus::Skipped,
                        details: "skipped because the database is unreachable".to_string(),
                    },
                ];
            }
        };

        let connectivity = DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        };

        let catalog = match CatalogSeed::verify(&pool).await {
            Ok(verification) if verification.all_present => DoctorCheck {
                name: "catalog_readiness",
                status: CheckStatus::Pass,
                details: format!("{} starter products present", verification.checks.len()),
            },
            Ok(verification) => {
                let missing = verification.checks.iter().filter(|(_, present)| !present).count();
                DoctorCheck {
                    name: "catalog_readiness",
                    status: CheckStatus::Fail,
                    details: format!("{missing} starter products missing; run `petworld seed`"),
                }
            }
            Err(error) => DoctorCheck {
                name: "catalog_readiness",
                status: CheckStatus::Fail,
                details: format!("catalog unreadable ({error}); run `petworld migrate`"),
            },
        };

        pool.close().await;
        vec![connectivity, catalog]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
