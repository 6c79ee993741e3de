use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The analysis styles a user can request. Premium variants additionally
/// need trading parameters before an upload can go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisVariant {
    Swing,
    Scalp,
    SwingPremium,
    ScalpPremium,
}

impl AnalysisVariant {
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::SwingPremium | Self::ScalpPremium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swing => "swing",
            Self::Scalp => "scalp",
            Self::SwingPremium => "swing_premium",
            Self::ScalpPremium => "scalp_premium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown analysis variant: {0}")]
pub struct UnknownVariant(pub String);

impl std::str::FromStr for AnalysisVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "swing" => Ok(Self::Swing),
            "scalp" => Ok(Self::Scalp),
            "swing_premium" => Ok(Self::SwingPremium),
            "scalp_premium" => Ok(Self::ScalpPremium),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
        }
    }
}

/// Validated trading inputs for a premium analysis. Created fresh per
/// attempt, never persisted anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingParameters {
    pub account_size: Option<f64>,
    pub risk_percent: f64,
    pub leverage: u32,
    pub order_type: OrderType,
}

impl TradingParameters {
    /// Multipart text fields for the upload request.
    pub fn as_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if let Some(size) = self.account_size {
            fields.push(("account_size", size.to_string()));
        }
        fields.push(("risk_percent", self.risk_percent.to_string()));
        fields.push(("leverage", self.leverage.to_string()));
        fields.push(("order_type", self.order_type.as_str().to_string()));
        fields
    }
}

/// Raw form state as the user typed it. Validation turns this into
/// `TradingParameters` or a list of per-field issues to surface inline.
#[derive(Debug, Clone, Default)]
pub struct ParameterForm {
    pub account_size: String,
    pub risk_percent: String,
    pub leverage: String,
    pub order_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid trading parameters ({} issue(s))", .issues.len())]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }
}

impl ParameterForm {
    pub fn validate(&self) -> Result<TradingParameters, ValidationErrors> {
        let mut issues = Vec::new();

        // 1. Account size is optional but must be positive when given
        let account_size = match self.account_size.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => Some(v),
                Ok(_) => {
                    issues.push(FieldIssue {
                        field: "account_size",
                        message: "must be greater than zero".to_string(),
                    });
                    None
                }
                Err(_) => {
                    issues.push(FieldIssue {
                        field: "account_size",
                        message: "must be a number".to_string(),
                    });
                    None
                }
            },
        };

        // 2. Risk percent is required, numeric and positive
        let risk_percent = match self.risk_percent.trim() {
            "" => {
                issues.push(FieldIssue {
                    field: "risk_percent",
                    message: "is required".to_string(),
                });
                0.0
            }
            raw => match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => v,
                Ok(_) => {
                    issues.push(FieldIssue {
                        field: "risk_percent",
                        message: "must be greater than zero".to_string(),
                    });
                    0.0
                }
                Err(_) => {
                    issues.push(FieldIssue {
                        field: "risk_percent",
                        message: "must be a number".to_string(),
                    });
                    0.0
                }
            },
        };

        // 3. Leverage is required and a whole number of at least 1
        let leverage = match self.leverage.trim() {
            "" => {
                issues.push(FieldIssue {
                    field: "leverage",
                    message: "is required".to_string(),
                });
                0
            }
            raw => match raw.parse::<u32>() {
                Ok(v) if v >= 1 => v,
                Ok(_) => {
                    issues.push(FieldIssue {
                        field: "leverage",
                        message: "must be at least 1".to_string(),
                    });
                    0
                }
                Err(_) => {
                    issues.push(FieldIssue {
                        field: "leverage",
                        message: "must be a whole number".to_string(),
                    });
                    0
                }
            },
        };

        // 4. Order type defaults to market when left blank
        let order_type = match self.order_type.trim() {
            "" => OrderType::Market,
            raw => match raw.to_lowercase().as_str() {
                "market" => OrderType::Market,
                "limit" => OrderType::Limit,
                _ => {
                    issues.push(FieldIssue {
                        field: "order_type",
                        message: "must be market or limit".to_string(),
                    });
                    OrderType::Market
                }
            },
        };

        if issues.is_empty() {
            Ok(TradingParameters {
                account_size,
                risk_percent,
                leverage,
                order_type,
            })
        } else {
            Err(ValidationErrors { issues })
        }
    }
}

// Enough of a PNG header for the simulator to have something to chew on.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Chart screenshot queued for upload.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "chart.png".to_string());
        Ok(Self { file_name, bytes })
    }

    /// Decode a `data:image/png;base64,...` URL, the shape the web frontend
    /// keeps dropped screenshots in before upload.
    pub fn from_data_url(file_name: &str, data_url: &str) -> anyhow::Result<Self> {
        let (header, payload) = data_url
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("not a data URL"))?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            anyhow::bail!("unsupported data URL header: {}", header);
        }
        let bytes = BASE64.decode(payload.trim())?;
        Ok(Self {
            file_name: file_name.to_string(),
            bytes,
        })
    }

    /// Minimal stand-in image for simulator runs.
    pub fn placeholder() -> Self {
        Self {
            file_name: "chart.png".to_string(),
            bytes: PNG_SIGNATURE.to_vec(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        let lower = self.file_name.to_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            "image/jpeg"
        } else if lower.ends_with(".webp") {
            "image/webp"
        } else {
            "image/png"
        }
    }
}

/// Everything the backend needs for one analysis run.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub request_id: Uuid,
    pub image: ChartImage,
    pub variant: AnalysisVariant,
    pub parameters: Option<TradingParameters>,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn premium_form() -> ParameterForm {
        ParameterForm {
            account_size: "10000".to_string(),
            risk_percent: "1.5".to_string(),
            leverage: "5".to_string(),
            order_type: "limit".to_string(),
        }
    }

    #[test]
    fn test_valid_form_produces_parameters() {
        let params = premium_form().validate().unwrap();
        assert_eq!(params.account_size, Some(10000.0));
        assert_eq!(params.risk_percent, 1.5);
        assert_eq!(params.leverage, 5);
        assert_eq!(params.order_type, OrderType::Limit);
    }

    #[test]
    fn test_missing_risk_percent_is_field_addressed() {
        let mut form = premium_form();
        form.risk_percent = "".to_string();
        form.order_type = "market".to_string();
        form.leverage = "1".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.issues.len(), 1);
        assert_eq!(errors.message_for("risk_percent"), Some("is required"));
        assert!(errors.message_for("leverage").is_none());
    }

    #[test]
    fn test_account_size_is_optional() {
        let mut form = premium_form();
        form.account_size = "   ".to_string();
        let params = form.validate().unwrap();
        assert_eq!(params.account_size, None);
    }

    #[test]
    fn test_leverage_must_be_whole_and_positive() {
        let mut form = premium_form();
        form.leverage = "0".to_string();
        assert_eq!(
            form.validate().unwrap_err().message_for("leverage"),
            Some("must be at least 1")
        );

        form.leverage = "1.5".to_string();
        assert_eq!(
            form.validate().unwrap_err().message_for("leverage"),
            Some("must be a whole number")
        );
    }

    #[test]
    fn test_order_type_defaults_to_market() {
        let mut form = premium_form();
        form.order_type = "".to_string();
        assert_eq!(form.validate().unwrap().order_type, OrderType::Market);

        form.order_type = "stop".to_string();
        assert_eq!(
            form.validate().unwrap_err().message_for("order_type"),
            Some("must be market or limit")
        );
    }

    #[test]
    fn test_multiple_issues_accumulate() {
        let form = ParameterForm {
            account_size: "-5".to_string(),
            risk_percent: "abc".to_string(),
            leverage: "".to_string(),
            order_type: "market".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.issues.len(), 3);
        assert!(errors.message_for("account_size").is_some());
        assert!(errors.message_for("risk_percent").is_some());
        assert!(errors.message_for("leverage").is_some());
    }

    #[test]
    fn test_variant_parsing_and_premium_flag() {
        assert_eq!("swing".parse::<AnalysisVariant>().unwrap(), AnalysisVariant::Swing);
        assert_eq!(
            "SCALP_PREMIUM".parse::<AnalysisVariant>().unwrap(),
            AnalysisVariant::ScalpPremium
        );
        assert!("day_trade".parse::<AnalysisVariant>().is_err());

        assert!(!AnalysisVariant::Swing.is_premium());
        assert!(!AnalysisVariant::Scalp.is_premium());
        assert!(AnalysisVariant::SwingPremium.is_premium());
        assert!(AnalysisVariant::ScalpPremium.is_premium());
    }

    #[test]
    fn test_form_fields_skip_absent_account_size() {
        let params = TradingParameters {
            account_size: None,
            risk_percent: 2.0,
            leverage: 10,
            order_type: OrderType::Market,
        };
        let fields = params.as_form_fields();
        assert!(!fields.iter().any(|(name, _)| *name == "account_size"));
        assert!(fields.contains(&("risk_percent", "2".to_string())));
        assert!(fields.contains(&("leverage", "10".to_string())));
        assert!(fields.contains(&("order_type", "market".to_string())));
    }

    #[test]
    fn test_image_from_data_url() {
        let image = ChartImage::from_data_url("chart.png", "data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.bytes[..4], [0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(image.mime_type(), "image/png");

        assert!(ChartImage::from_data_url("x.png", "not a url").is_err());
    }

    #[test]
    fn test_mime_from_extension() {
        let mut image = ChartImage::placeholder();
        image.file_name = "shot.JPG".to_string();
        assert_eq!(image.mime_type(), "image/jpeg");
        image.file_name = "shot.webp".to_string();
        assert_eq!(image.mime_type(), "image/webp");
        image.file_name = "shot".to_string();
        assert_eq!(image.mime_type(), "image/png");
    }
}
