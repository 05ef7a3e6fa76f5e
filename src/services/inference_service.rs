//! 推理服务：形状校验、调用模型、健康自检

use crate::{
    error::AppError,
    inference::{Model, ModelError},
    models::prediction::PredictionResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MODEL_NOT_LOADED: &str = "Model is not loaded";

/// 健康状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// 健康报告
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// 推理网关
///
/// 持有启动时加载的模型句柄，之后只读。
pub struct InferenceService {
    model: Option<Arc<dyn Model>>,
}

impl InferenceService {
    pub fn new(model: Option<Arc<dyn Model>>) -> Self {
        Self { model }
    }

    /// 获取模型，未加载时返回 503
    pub fn require_model(&self) -> Result<Arc<dyn Model>, AppError> {
        self.model.clone().ok_or_else(|| {
            tracing::error!("{}", MODEL_NOT_LOADED);
            AppError::ServiceUnavailable(MODEL_NOT_LOADED.to_string())
        })
    }

    /// 校验特征向量：先检查空向量，再检查维度
    pub fn validate_features(expected: usize, features: &[f64]) -> Result<(), AppError> {
        if features.is_empty() {
            return Err(AppError::bad_request("Feature vector must not be empty"));
        }

        if features.len() != expected {
            tracing::warn!(
                expected = expected,
                received = features.len(),
                "Wrong number of features"
            );
            return Err(AppError::BadRequest(format!(
                "Expected {} features, got {}",
                expected,
                features.len()
            )));
        }

        Ok(())
    }

    /// 执行预测
    pub async fn predict(&self, features: Vec<f64>) -> Result<PredictionResponse, AppError> {
        let model = self.require_model()?;
        Self::predict_with(model, features).await
    }

    /// 使用给定模型执行预测
    ///
    /// 模型在阻塞线程池中运行；模型错误或 panic 只记录日志，对外返回通用 500。
    async fn predict_with(
        model: Arc<dyn Model>,
        features: Vec<f64>,
    ) -> Result<PredictionResponse, AppError> {
        Self::validate_features(model.n_features(), &features)?;

        let outcome = tokio::task::spawn_blocking(move || run_model(model.as_ref(), &features))
            .await;

        match outcome {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Prediction failed");
                Err(AppError::Internal(format!("Prediction failed: {}", e)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Prediction task aborted");
                Err(AppError::internal_error("Prediction task aborted"))
            }
        }
    }

    /// 健康检查：对零向量做一次冒烟预测
    pub async fn health_report(&self) -> HealthReport {
        let Some(model) = self.model.clone() else {
            return HealthReport {
                status: HealthStatus::Unhealthy,
                model_loaded: false,
                detail: Some(MODEL_NOT_LOADED.to_string()),
            };
        };

        let smoke = tokio::task::spawn_blocking(move || {
            let zeros = vec![0.0; model.n_features()];
            model.predict(&zeros).map(|_| ())
        })
        .await;

        let failure = match smoke {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(format!("smoke test aborted: {}", e)),
        };

        match failure {
            None => {
                tracing::debug!("Model smoke test passed");
                HealthReport {
                    status: HealthStatus::Healthy,
                    model_loaded: true,
                    detail: None,
                }
            }
            Some(reason) => {
                tracing::error!(reason = %reason, "Model smoke test failed");
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    model_loaded: true,
                    detail: Some(format!("Model is faulty: {}", reason)),
                }
            }
        }
    }
}

fn run_model(model: &dyn Model, features: &[f64]) -> Result<PredictionResponse, ModelError> {
    let prediction = model.predict(features)?;
    let probabilities = model.predict_proba(features).transpose()?;

    Ok(PredictionResponse {
        prediction,
        probabilities,
    })
}
