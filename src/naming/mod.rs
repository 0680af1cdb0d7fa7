//! Deterministic names for downloaded images.
//!
//! `<year>/<dd-mm-yyyy>_<base>.jpg`, where the year and date come from the
//! free-text published date on the list page and `base` is the image's
//! original filename (or the last segment of its URL).

use chrono::NaiveDate;
use url::Url;

use crate::domain::ImageDescriptor;

pub const UNKNOWN_DATE: &str = "unknown-date";
pub const UNKNOWN_YEAR: &str = "unknown";

fn month_number(token: &str) -> Option<u32> {
    let month = match token.to_lowercase().as_str() {
        "januari" | "january" | "jan" => 1,
        "februari" | "february" | "feb" | "pebruari" => 2,
        "maret" | "march" | "mar" => 3,
        "april" | "apr" => 4,
        "mei" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "agustus" | "august" | "agu" | "agt" | "ags" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nopember" | "nov" => 11,
        "desember" | "december" | "des" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn day_number(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn year_number(token: &str) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse a published-date string into a calendar date.
///
/// Handles the archive's `12 Januari 2024` form (optionally prefixed by a
/// weekday or followed by a time), English month names, and numeric
/// `2024-01-12` / `12/01/2024` forms.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    let tokens: Vec<&str> = trimmed
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.')
        .filter(|t| !t.is_empty())
        .collect();

    let month_at = tokens.iter().position(|t| month_number(t).is_some())?;
    let month = month_number(tokens[month_at])?;

    let day = month_at
        .checked_sub(1)
        .and_then(|i| day_number(tokens[i]))
        .or_else(|| tokens.get(month_at + 1).and_then(|t| day_number(t)))?;

    let year = tokens[month_at..].iter().find_map(|t| year_number(t))?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// `dd-mm-yyyy`, or [`UNKNOWN_DATE`] when the string cannot be parsed
pub fn normalize_date(raw: Option<&str>) -> String {
    raw.and_then(parse_published_date)
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// First run of four digits in the raw date, or [`UNKNOWN_YEAR`]
pub fn year_bucket(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_YEAR.to_string();
    };

    let bytes = raw.as_bytes();
    bytes
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|i| raw[i..i + 4].to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

/// Replace every character outside `[A-Za-z0-9]` with `_`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

fn last_path_segment(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.path_segments()?
        .rfind(|s| !s.is_empty())
        .map(str::to_string)
}

/// File name for the `position`-th image (0-based) of an article
pub fn derive_filename(
    published_date_raw: Option<&str>,
    image: &ImageDescriptor,
    title: Option<&str>,
    position: usize,
) -> String {
    let date = normalize_date(published_date_raw);

    let base = image
        .suggested_filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| strip_extension(name).to_string())
        .or_else(|| last_path_segment(&image.source_url).map(|s| strip_extension(&s).to_string()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{}_{}", title.unwrap_or("untitled"), position + 1));

    format!("{}_{}.jpg", date, sanitize(&base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indonesian_date() {
        assert_eq!(normalize_date(Some("12 Januari 2024")), "12-01-2024");
        assert_eq!(normalize_date(Some("3 Agustus 2025")), "03-08-2025");
        assert_eq!(normalize_date(Some("Jumat, 1 Maret 2024 09:15")), "01-03-2024");
    }

    #[test]
    fn test_english_and_numeric_dates() {
        assert_eq!(normalize_date(Some("May 7, 2024")), "07-05-2024");
        assert_eq!(normalize_date(Some("2024-02-29")), "29-02-2024");
        assert_eq!(normalize_date(Some("05/11/2024")), "05-11-2024");
    }

    #[test]
    fn test_unparseable_date() {
        assert_eq!(normalize_date(Some("kemarin sore")), UNKNOWN_DATE);
        assert_eq!(normalize_date(Some("31 Februari 2024")), UNKNOWN_DATE);
        assert_eq!(normalize_date(None), UNKNOWN_DATE);
        assert_eq!(year_bucket(Some("kemarin sore")), UNKNOWN_YEAR);
        assert_eq!(year_bucket(None), UNKNOWN_YEAR);
    }

    #[test]
    fn test_year_bucket() {
        assert_eq!(year_bucket(Some("12 Januari 2024")), "2024");
        assert_eq!(year_bucket(Some("Kamis, 2 Mei 2025")), "2025");
        assert_eq!(year_bucket(Some("12 Jan 24")), UNKNOWN_YEAR);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("foto utama (1)"), "foto_utama__1_");
        assert_eq!(sanitize("Kliping-2024"), "Kliping_2024");
    }

    #[test]
    fn test_filename_prefers_suggested_name() {
        let image = ImageDescriptor::new("https://example.com/uploads/abc123.jpg")
            .with_filename("KR hal 3.jpg");
        assert_eq!(
            derive_filename(Some("12 Januari 2024"), &image, Some("Judul"), 0),
            "12-01-2024_KR_hal_3.jpg"
        );
    }

    #[test]
    fn test_filename_falls_back_to_url_segment() {
        let image = ImageDescriptor::new("https://example.com/uploads/2024/abc-123.jpeg?v=2");
        assert_eq!(
            derive_filename(Some("12 Januari 2024"), &image, None, 0),
            "12-01-2024_abc_123.jpg"
        );
    }

    #[test]
    fn test_filename_falls_back_to_title_and_position() {
        let image = ImageDescriptor::new("data:image/png;base64,AAAA");
        assert_eq!(
            derive_filename(None, &image, Some("Banjir Lahar"), 1),
            "unknown-date_Banjir_Lahar_2.jpg"
        );
    }

    #[test]
    fn test_colliding_names() {
        let a = ImageDescriptor::new("https://a.example.com/x/foto.jpg");
        let b = ImageDescriptor::new("https://b.example.com/y/foto.png");
        assert_eq!(
            derive_filename(Some("12 Januari 2024"), &a, None, 0),
            derive_filename(Some("12 Januari 2024"), &b, None, 1)
        );
    }
}
