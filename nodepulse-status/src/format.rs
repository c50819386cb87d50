/**
 * FORMAT - Rendu texte des chiffres de charge et des champs passthrough
 *
 * RÔLE : Politique numérique figée (0 à 1 décimale, arrondi half-up,
 * séparateur de milliers) partagée par les six substitutions des textes de
 * charge, plus les helpers tag/horodatage.
 *
 * La politique est une valeur `const` : aucune mutation possible au runtime,
 * le rendu reste reproductible d'un appel à l'autre.
 */

use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

/// Placeholder rendu à la place d'un tag vide
pub const EMPTY_PLACEHOLDER: &str = "N/A";

const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Politique de rendu numérique immuable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub min_fraction_digits: u32,
    pub max_fraction_digits: u32,
    pub grouping: bool,
}

/// Politique des textes de charge : "27", "27.7", "1,024"
pub const LOAD_NUMBER_FORMAT: NumberFormat = NumberFormat {
    min_fraction_digits: 0,
    max_fraction_digits: 1,
    grouping: true,
};

impl NumberFormat {
    /// Rend `value` avec arrondi half-up sur `max_fraction_digits` décimales,
    /// en supprimant les zéros de fin au-delà de `min_fraction_digits`.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let max_digits = self.max_fraction_digits.max(self.min_fraction_digits);
        let scale = 10u128.pow(max_digits);
        // f64::round arrondit les demis loin de zéro, soit half-up sur la magnitude
        let scaled = (value.abs() * scale as f64).round() as u128;
        let integer = scaled / scale;
        let fraction = scaled % scale;

        let mut out = String::new();
        if value.is_sign_negative() && scaled != 0 {
            out.push('-');
        }
        out.push_str(&self.group(integer));

        if max_digits > 0 {
            let digits = format!("{:0width$}", fraction, width = max_digits as usize);
            let keep = digits.trim_end_matches('0').len().max(self.min_fraction_digits as usize);
            if keep > 0 {
                out.push('.');
                out.push_str(&digits[..keep]);
            }
        }
        out
    }

    fn group(&self, integer: u128) -> String {
        let raw = integer.to_string();
        if !self.grouping || raw.len() <= 3 {
            return raw;
        }
        let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
        for (i, c) in raw.chars().enumerate() {
            if i > 0 && (raw.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        grouped
    }
}

/// Retourne `value` tel quel, ou le placeholder s'il est vide
pub fn format_or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Rend un horodatage epoch millis en "yyyy-MM-dd HH:mm:ss" (UTC)
pub fn format_time(epoch_millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(epoch_millis as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(TIME_FORMAT).ok())
        .unwrap_or_else(|| epoch_millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64) -> String {
        LOAD_NUMBER_FORMAT.format(value)
    }

    #[test]
    fn test_integral_values_drop_the_decimal_point() {
        assert_eq!(fmt(27.0), "27");
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(8.0), "8");
    }

    #[test]
    fn test_one_fraction_digit_round_half_up() {
        assert_eq!(fmt(27.66), "27.7");
        assert_eq!(fmt(27.64), "27.6");
        assert_eq!(fmt(0.25), "0.3");
        assert_eq!(fmt(2.95), "3");
        assert_eq!(fmt(0.277 * 100.0), "27.7");
    }

    #[test]
    fn test_thousands_are_grouped() {
        assert_eq!(fmt(1024.0), "1,024");
        assert_eq!(fmt(1234567.89), "1,234,567.9");
        assert_eq!(fmt(999.96), "1,000");
    }

    #[test]
    fn test_negative_and_non_finite_values() {
        assert_eq!(fmt(-1.25), "-1.3");
        assert_eq!(fmt(-0.01), "0");
        assert_eq!(fmt(f64::NAN), "NaN");
    }

    #[test]
    fn test_min_fraction_digits_are_kept() {
        let two = NumberFormat { min_fraction_digits: 1, max_fraction_digits: 2, grouping: false };
        assert_eq!(two.format(3.0), "3.0");
        assert_eq!(two.format(3.456), "3.46");
        assert_eq!(two.format(1500.5), "1500.5");
    }

    #[test]
    fn test_placeholder_only_for_empty_values() {
        assert_eq!(format_or_placeholder("", EMPTY_PLACEHOLDER), "N/A");
        assert_eq!(format_or_placeholder("gpu", EMPTY_PLACEHOLDER), "gpu");
        assert_eq!(format_or_placeholder(" ", EMPTY_PLACEHOLDER), " ");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "1970-01-01 00:00:00");
        assert_eq!(format_time(1_700_000_000_123), "2023-11-14 22:13:20");
    }
}
