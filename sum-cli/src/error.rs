use std::process::ExitCode;

/// プロセスの終了ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    UsageError = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

/// 入力不正時のエラー
#[derive(Debug, thiserror::Error)]
pub enum SumError {
    #[error("expected 2 operands, got {got}")]
    MissingOperand { got: usize },
    /// `ParseMode::Strict` のときのみ
    #[error("invalid operand {position}: '{value}'")]
    InvalidOperand { position: usize, value: String },
}

impl SumError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::MissingOperand { .. } | Self::InvalidOperand { .. } => ExitStatus::UsageError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_values() {
        assert_eq!(ExitStatus::Success as u8, 0);
        assert_eq!(ExitStatus::UsageError as u8, 1);
    }

    #[test]
    fn every_error_is_a_usage_error() {
        let missing = SumError::MissingOperand { got: 1 };
        let invalid = SumError::InvalidOperand {
            position: 2,
            value: "x".to_string(),
        };
        assert_eq!(missing.exit_status(), ExitStatus::UsageError);
        assert_eq!(invalid.exit_status(), ExitStatus::UsageError);
        assert_eq!(invalid.to_string(), "invalid operand 2: 'x'");
    }
}
