//! The Caffeine architecture diagrams.
//!
//! [`caffeine_diagrams`] declares the four diagrams served by the Caffeine
//! viewer, in the order they are rendered. Each [`CatalogEntry`] also carries
//! the id and display title the viewer lists it under.

use serde::Serialize;

use caffeine_diagrams_core::semantic::{Diagram, Direction, Icon};

use crate::{config::OutputFormat, error::CaffeineError};

/// A diagram together with its viewer metadata
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    diagram: Diagram,
}

impl CatalogEntry {
    pub fn new(id: &'static str, title: &'static str, diagram: Diagram) -> Self {
        Self { id, title, diagram }
    }

    /// Short id used by the viewer
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Display title shown by the viewer
    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Image file name for `format`
    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("{}.{}", self.diagram.filename(), format.extension())
    }
}

/// One line of the viewer manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub title: String,
    pub file: String,
}

/// All Caffeine diagrams in rendering order.
pub fn caffeine_diagrams() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("architecture", "전체 아키텍처", architecture()),
        CatalogEntry::new("deployment", "배포 구조", deployment()),
        CatalogEntry::new("ml_pipeline", "ML 파이프라인", ml_pipeline()),
        CatalogEntry::new("data_flow", "데이터 흐름", data_flow()),
    ]
}

/// Manifest entries for `entries` rendered as `format`.
pub fn manifest(entries: &[CatalogEntry], format: OutputFormat) -> Vec<ManifestEntry> {
    entries
        .iter()
        .map(|entry| ManifestEntry {
            id: entry.id().to_string(),
            title: entry.title().to_string(),
            file: entry.file_name(format),
        })
        .collect()
}

/// Pretty-printed JSON for `manifest`.
///
/// # Errors
///
/// Returns [`CaffeineError::Export`] if serialization fails.
pub fn manifest_json(manifest: &[ManifestEntry]) -> Result<String, CaffeineError> {
    serde_json::to_string_pretty(manifest).map_err(|err| CaffeineError::Export(Box::new(err)))
}

fn architecture() -> Diagram {
    Diagram::build(
        "Caffeine Architecture",
        "caffeine_architecture",
        Direction::TopBottom,
        |scope| {
            let users = scope.node(Icon::Users, "Users");

            let (user_app, admin_app) = scope.cluster("Frontend", |frontend| {
                (
                    frontend.node(Icon::React, "User App\n(React Native)"),
                    frontend.node(Icon::React, "Admin App\n(Next.js)"),
                )
            });
            let alb = scope.cluster("Gateway", |gateway| {
                gateway.node(Icon::Alb, "Application Load Balancer\nAWS ALB")
            });
            let api = scope.cluster("Backend", |backend| {
                backend.node(Icon::FastApi, "FastAPI\nPython 3.10")
            });
            let (ml_next, ml_fraud) = scope.cluster("ML Services", |ml| {
                (
                    ml.node(Icon::Mlflow, "ML Next\nXGBoost"),
                    ml.node(Icon::Mlflow, "ML Fraud\nAnomaly"),
                )
            });
            let llm = scope.cluster("LLM Services", |llm| {
                llm.node(Icon::Rack, "Gemini 2.0\nFlash")
            });
            let db = scope.cluster("Database", |database| {
                database.node(Icon::PostgreSql, "PostgreSQL\nAWS RDS")
            });

            scope.chain(&[users, user_app, alb]);
            scope.chain(&[users, admin_app, alb]);
            scope.connect(alb, api);
            scope.fan_out(api, &[ml_next, ml_fraud, llm, db]);
        },
    )
}

fn deployment() -> Diagram {
    Diagram::build(
        "Caffeine Deployment",
        "caffeine_deployment",
        Direction::LeftRight,
        |scope| {
            let (github, docker_local) = scope.cluster("Development", |dev| {
                (
                    dev.node(Icon::Server, "GitHub"),
                    dev.node(Icon::Docker, "Docker Compose"),
                )
            });
            let (ecr, ecs, rds) = scope.cluster("AWS Cloud", |aws| {
                (
                    aws.node(Icon::Docker, "AWS ECR"),
                    aws.node(Icon::Ecs, "AWS ECS"),
                    aws.node(Icon::Rds, "AWS RDS"),
                )
            });
            let (gemini, gmail) = scope.cluster("External Services", |external| {
                (
                    external.node(Icon::Rack, "Google\nGemini API"),
                    external.node(Icon::Slack, "Gmail SMTP"),
                )
            });

            scope.connect(github, docker_local);
            scope.chain(&[github, ecr, ecs]);
            scope.fan_out(ecs, &[rds, gemini, gmail]);
        },
    )
}

fn ml_pipeline() -> Diagram {
    Diagram::build(
        "Caffeine ML Pipeline",
        "caffeine_ml_pipeline",
        Direction::LeftRight,
        |scope| {
            let input = scope.cluster("Input", |input| {
                input.node(Icon::Server, "Transaction\nData")
            });
            let features = scope.cluster("Feature Engineering", |features| {
                vec![
                    features.node(Icon::Rack, "금액 범위"),
                    features.node(Icon::Rack, "시간대"),
                    features.node(Icon::Rack, "요일"),
                    features.node(Icon::Rack, "텍스트 특징"),
                ]
            });
            let xgboost = scope.cluster("Model", |model| {
                model.node(Icon::Mlflow, "XGBoost\nClassifier")
            });
            let outputs = scope.cluster("Output", |output| {
                vec![
                    output.node(Icon::Server, "카테고리\n(15개)"),
                    output.node(Icon::Server, "확률 점수"),
                ]
            });

            scope.fan_out(input, &features);
            scope.fan_in(&features, xgboost);
            scope.fan_out(xgboost, &outputs);
        },
    )
}

fn data_flow() -> Diagram {
    Diagram::build(
        "Caffeine Data Flow",
        "caffeine_data_flow",
        Direction::TopBottom,
        |scope| {
            let (user, app) = scope.cluster("Client Layer", |client| {
                (
                    client.node(Icon::Users, "사용자"),
                    client.node(Icon::React, "Mobile App"),
                )
            });
            let api = scope.cluster("API Layer", |layer| layer.node(Icon::FastApi, "FastAPI"));
            let (ml, llm) = scope.cluster("Processing", |processing| {
                (
                    processing.node(Icon::Mlflow, "ML Service"),
                    processing.node(Icon::Rack, "LLM Service"),
                )
            });
            let db = scope.cluster("Storage", |storage| {
                storage.node(Icon::PostgreSql, "PostgreSQL")
            });

            scope.connect_labeled(user, app, "요청");
            scope.connect_labeled(app, api, "API Call");
            scope.connect_labeled(api, ml, "예측");
            scope.connect_labeled(api, llm, "분석");
            scope.connect_labeled(api, db, "저장");
            scope.connect_labeled(db, api, "응답");
            scope.connect_labeled(api, app, "결과");
            scope.connect_labeled(app, user, "표시");
        },
    )
}
