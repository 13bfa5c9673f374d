//! JSON and CSV persistence for crawled records.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::result::MovieRecord;

/// Separator between comments in the single CSV `comments` column.
pub const COMMENT_SEPARATOR: &str = " | ";

/// UTF-8 byte order mark; spreadsheet tools need it to read Chinese text.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `movies` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save_json(path: &Path, movies: &[MovieRecord]) -> Result<()> {
    ensure_parent(path)?;

    let json = serde_json::to_string_pretty(movies)?;
    fs::write(path, json)?;

    info!(path = %path.display(), count = movies.len(), "saved movies");
    Ok(())
}

/// Read records previously written by [`save_json`].
pub fn load_json(path: &Path) -> Result<Vec<MovieRecord>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// One CSV line: a [`MovieRecord`] with its comments flattened.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    name: String,
    url: String,
    release_date: String,
    country: String,
    wish_count: u64,
    comments: String,
}

impl From<&MovieRecord> for CsvRow {
    fn from(movie: &MovieRecord) -> Self {
        Self {
            name: movie.name.clone(),
            url: movie.url.clone(),
            release_date: movie.release_date.clone(),
            country: movie.country.clone(),
            wish_count: movie.wish_count,
            comments: movie.comments.join(COMMENT_SEPARATOR),
        }
    }
}

impl From<CsvRow> for MovieRecord {
    fn from(row: CsvRow) -> Self {
        let comments = if row.comments.is_empty() {
            Vec::new()
        } else {
            row.comments.split(COMMENT_SEPARATOR).map(str::to_string).collect()
        };
        Self {
            name: row.name,
            url: row.url,
            release_date: row.release_date,
            country: row.country,
            wish_count: row.wish_count,
            comments,
        }
    }
}

/// Write `movies` to `path` as BOM-prefixed UTF-8 CSV with a header row.
///
/// Comments share one column, joined with [`COMMENT_SEPARATOR`]; a comment
/// that itself contains the separator is split on reload.
pub fn save_csv(path: &Path, movies: &[MovieRecord]) -> Result<()> {
    ensure_parent(path)?;

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    for movie in movies {
        writer.serialize(CsvRow::from(movie))?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = movies.len(), "saved movies as csv");
    Ok(())
}

/// Read records previously written by [`save_csv`].
pub fn load_csv(path: &Path) -> Result<Vec<MovieRecord>> {
    let bytes = fs::read(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::Reader::from_reader(body);
    let mut movies = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        movies.push(MovieRecord::from(row?));
    }
    Ok(movies)
}

/// Save a crawl result as JSON and, when `csv_path` is given, as CSV.
///
/// An empty record set is refused with [`Error::NoMovies`]; existing files
/// are left untouched.
pub fn save_crawl(movies: &[MovieRecord], json_path: &Path, csv_path: Option<&Path>) -> Result<()> {
    if movies.is_empty() {
        return Err(Error::NoMovies);
    }

    save_json(json_path, movies)?;
    if let Some(csv_path) = csv_path {
        save_csv(csv_path, movies)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MovieRecord> {
        vec![
            MovieRecord {
                url: "https://movie.douban.com/subject/1/".to_string(),
                wish_count: 42,
                comments: vec!["很好看的电影".to_string(), "特效, 震撼".to_string()],
                ..MovieRecord::named("流浪地球")
            },
            MovieRecord::named("无评论"),
        ]
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/movies.json");

        let movies = sample();
        save_json(&path, &movies).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("流浪地球"));
        assert!(raw.contains('\n'));
        assert_eq!(load_json(&path).unwrap(), movies);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_json(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn load_garbage_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_json(&path), Err(Error::Json(_))));
    }

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/movies.csv");

        let movies = sample();
        save_csv(&path, &movies).unwrap();

        assert_eq!(load_csv(&path).unwrap(), movies);
    }

    #[test]
    fn csv_has_bom_header_and_joined_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");

        save_csv(&path, &sample()).unwrap();
        let raw = fs::read(&path).unwrap();

        assert!(raw.starts_with(UTF8_BOM));
        let text = String::from_utf8(raw[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,url,release_date,country,wish_count,comments"));
        assert!(lines.next().unwrap().ends_with(r#",42,"很好看的电影 | 特效, 震撼""#));
    }

    #[test]
    fn save_crawl_writes_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("movies.json");
        let csv_path = dir.path().join("movies.csv");

        save_crawl(&sample(), &json, Some(csv_path.as_path())).unwrap();

        assert_eq!(load_json(&json).unwrap(), sample());
        assert_eq!(load_csv(&csv_path).unwrap(), sample());
    }

    #[test]
    fn save_crawl_refuses_empty_result_and_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("movies.json");
        save_json(&json, &sample()).unwrap();

        let result = save_crawl(&[], &json, None);

        assert!(matches!(result, Err(Error::NoMovies)));
        assert_eq!(load_json(&json).unwrap(), sample());
    }

    #[test]
    fn csv_bad_number_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "name,url,release_date,country,wish_count,comments\nx,,,,many,\n").unwrap();

        assert!(matches!(load_csv(&path), Err(Error::Csv(_))));
    }
}
