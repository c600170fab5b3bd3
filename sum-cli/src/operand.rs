//! オペランドの解釈
//!
//! `scan_prefix` は C の `strtod` と同じ規則で先頭の数値部分を読む。
//! 空白、符号、10進数 / 16進浮動小数点 / `inf` / `nan` の順。

use std::ffi::OsStr;

use clap::ValueEnum;

use crate::error::SumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ParseMode {
    /// 先頭の数値部分を使い、数値が無ければ 0 とする
    #[default]
    Permissive,
    /// 全体が数値でなければエラー
    Strict,
}

/// `position` 番目（1始まり）のオペランドを `mode` に従って解釈する
pub fn parse_operand(arg: &OsStr, position: usize, mode: ParseMode) -> Result<f64, SumError> {
    let bytes = arg.as_encoded_bytes();
    match mode {
        ParseMode::Permissive => Ok(scan_prefix(bytes).map_or(0.0, |(value, _)| value)),
        ParseMode::Strict => {
            let trailing = bytes.iter().rev().take_while(|b| is_c_space(**b)).count();
            let body = &bytes[..bytes.len() - trailing];
            match scan_prefix(body) {
                Some((value, len)) if len == body.len() => Ok(value),
                _ => Err(SumError::InvalidOperand {
                    position,
                    value: arg.to_string_lossy().into_owned(),
                }),
            }
        }
    }
}

/// 先頭の数値部分の値と、そのバイト数を返す。数値で始まらなければ `None`。
pub fn scan_prefix(bytes: &[u8]) -> Option<(f64, usize)> {
    let mut i = bytes.iter().take_while(|b| is_c_space(**b)).count();
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let sign = if negative { -1.0 } else { 1.0 };
    let rest = &bytes[i..];

    if starts_with_ignore_case(rest, b"inf") {
        let len = if starts_with_ignore_case(rest, b"infinity") { 8 } else { 3 };
        return Some((sign * f64::INFINITY, i + len));
    }
    if starts_with_ignore_case(rest, b"nan") {
        let mut len = 3;
        // nan(n-char-sequence)
        if rest.get(3) == Some(&b'(') {
            let body = rest[4..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count();
            if rest.get(4 + body) == Some(&b')') {
                len = 4 + body + 1;
            }
        }
        return Some((f64::NAN.copysign(sign), i + len));
    }
    if let Some((value, len)) = scan_hex(rest) {
        return Some((sign * value, i + len));
    }

    let len = scan_decimal(rest)?;
    // ここまでに読んだ部分は ASCII のみ
    let value: f64 = std::str::from_utf8(&rest[..len]).ok()?.parse().ok()?;
    Some((sign * value, i + len))
}

fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn starts_with_ignore_case(bytes: &[u8], word: &[u8]) -> bool {
    bytes.len() >= word.len() && bytes[..word.len()].eq_ignore_ascii_case(word)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// `digits [. digits] [e [sign] digits]` の長さ。仮数部に数字が1つは必要。
/// 数字の続かない指数記号は読まない。
fn scan_decimal(bytes: &[u8]) -> Option<usize> {
    let int_digits = count_digits(bytes);
    let mut len = int_digits;
    let mut frac_digits = 0;
    if bytes.get(len) == Some(&b'.') {
        frac_digits = count_digits(&bytes[len + 1..]);
        if int_digits + frac_digits > 0 {
            len += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let mut k = len + 1;
        if matches!(bytes.get(k), Some(b'+' | b'-')) {
            k += 1;
        }
        let exp_digits = count_digits(&bytes[k..]);
        if exp_digits > 0 {
            len = k + exp_digits;
        }
    }
    Some(len)
}

fn hex_digit(b: Option<&u8>) -> Option<u64> {
    b.and_then(|b| (*b as char).to_digit(16)).map(u64::from)
}

/// 16進浮動小数点: `0x` hexdigits [. hexdigits] [p [sign] digits]
fn scan_hex(bytes: &[u8]) -> Option<(f64, usize)> {
    if !starts_with_ignore_case(bytes, b"0x") {
        return None;
    }
    const MANTISSA_LIMIT: u64 = 1 << 60;

    let mut mantissa: u64 = 0;
    let mut exponent: i64 = 0;
    // 仮数に入りきらず捨てた桁に 0 以外があったか
    let mut sticky = false;
    let mut digits = 0;
    let mut len = 2;

    while let Some(d) = hex_digit(bytes.get(len)) {
        if mantissa < MANTISSA_LIMIT {
            mantissa = mantissa * 16 + d;
        } else {
            exponent += 4;
            sticky |= d != 0;
        }
        digits += 1;
        len += 1;
    }
    if bytes.get(len) == Some(&b'.') {
        let mut k = len + 1;
        let mut frac_digits = 0;
        while let Some(d) = hex_digit(bytes.get(k)) {
            if mantissa < MANTISSA_LIMIT {
                mantissa = mantissa * 16 + d;
                exponent -= 4;
            } else {
                sticky |= d != 0;
            }
            frac_digits += 1;
            k += 1;
        }
        if digits + frac_digits > 0 {
            digits += frac_digits;
            len = k;
        }
    }
    // "0x" の後に16進数字が無い場合は先頭の "0" だけが数値
    if digits == 0 {
        return None;
    }
    // 仮数は 61 ビット以上あるので、最下位ビットは f64 の丸め位置より下
    if sticky {
        mantissa |= 1;
    }

    if matches!(bytes.get(len), Some(b'p' | b'P')) {
        let mut k = len + 1;
        let negative = match bytes.get(k) {
            Some(b'-') => {
                k += 1;
                true
            }
            Some(b'+') => {
                k += 1;
                false
            }
            _ => false,
        };
        let exp_digits = count_digits(&bytes[k..]);
        if exp_digits > 0 {
            let binary_exp = bytes[k..k + exp_digits]
                .iter()
                .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(100_000));
            exponent += if negative { -binary_exp } else { binary_exp };
            len = k + exp_digits;
        }
    }

    Some((scale_by_power_of_two(mantissa as f64, exponent), len))
}

fn scale_by_power_of_two(mut value: f64, mut exp: i64) -> f64 {
    while exp > 1000 && value.is_finite() {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 && value != 0.0 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value * 2f64.powi(exp.clamp(-1100, 1100) as i32)
}
