use std::ffi::OsString;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::error::{ExitStatus, SumError};
use crate::operand::{parse_operand, ParseMode};

pub const USAGE: &str = "usage: sum <a> <b>";

/// 2つの数値を加算するシンプルなプログラム
///
/// オペランドの位置に来た引数はすべて数値として読むため、
/// `--help` や `--` も clap には渡さない。
#[derive(Parser, Debug, Default)]
#[command(name = "sum", disable_help_flag = true, disable_version_flag = true)]
pub struct Options {
    /// 数値として読めない引数の扱い (permissive: 0 として扱う, strict: エラー)
    #[arg(long, value_enum, default_value_t = ParseMode::Permissive)]
    pub mode: ParseMode,
}

/// 先頭の `--mode <v>` / `--mode=<v>` を取り出し、残りをオペランドとして返す。
/// 値が不正ならオプションとはみなさず、そのままオペランドになる。
pub fn split_options(argv: Vec<OsString>) -> (Options, Vec<OsString>) {
    let mut args = argv.into_iter();
    let program = args.next().unwrap_or_else(|| OsString::from("sum"));
    let mut rest: Vec<OsString> = args.collect();

    let taken = match rest.first().and_then(|arg| arg.to_str()) {
        Some("--mode") if rest.len() >= 2 => 2,
        Some(arg) if arg.starts_with("--mode=") => 1,
        _ => 0,
    };
    if taken > 0 {
        let candidate = std::iter::once(program).chain(rest[..taken].iter().cloned());
        match Options::try_parse_from(candidate) {
            Ok(options) => {
                let operands = rest.split_off(taken);
                return (options, operands);
            }
            Err(e) => debug!(kind = ?e.kind(), "not a valid --mode, reading it as an operand"),
        }
    }
    (Options::default(), rest)
}

/// `argv` を解釈し、和を `out` に、診断を `err` に書き、終了ステータスを返す
pub fn run<I, T>(argv: I, out: &mut impl Write, err: &mut impl Write) -> Result<ExitStatus>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (options, operands) = split_options(argv.into_iter().map(Into::into).collect());

    match sum_operands(&operands, options.mode) {
        Ok(total) => {
            writeln!(out, "{}", format_fixed(total)).context("failed to write sum")?;
            out.flush().context("failed to flush stdout")?;
            Ok(ExitStatus::Success)
        }
        Err(e @ SumError::MissingOperand { .. }) => {
            debug!(error = %e, "not enough operands");
            writeln!(err, "{USAGE}").context("failed to write usage")?;
            Ok(e.exit_status())
        }
        Err(e) => {
            writeln!(err, "sum: {e}").context("failed to write error")?;
            Ok(e.exit_status())
        }
    }
}

/// 先頭2つのオペランドを加算する。3つ目以降は無視。
pub fn sum_operands(operands: &[OsString], mode: ParseMode) -> Result<f64, SumError> {
    let [a, b, rest @ ..] = operands else {
        return Err(SumError::MissingOperand {
            got: operands.len(),
        });
    };
    if !rest.is_empty() {
        debug!(ignored = rest.len(), "ignoring extra operands");
    }

    let a = parse_operand(a, 1, mode)?;
    let b = parse_operand(b, 2, mode)?;
    debug!(a, b, ?mode, "parsed operands");
    Ok(a + b)
}

/// C の `printf("%f")` と同じ形式（固定小数点、小数6桁）
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        let s = if value.is_sign_negative() { "-nan" } else { "nan" };
        return s.to_string();
    }
    if value.is_infinite() {
        let s = if value > 0.0 { "inf" } else { "-inf" };
        return s.to_string();
    }
    format!("{value:.6}")
}
