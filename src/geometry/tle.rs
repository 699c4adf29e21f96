use std::fs;
use std::path::Path;

use sgp4::{Constants, Elements};

use super::error::GeometryError;

/// ISS (ZARYA) element set from 2020-08-20, handy for demos and tests.
pub const ISS_2020_08_20: &str = "ISS (ZARYA)
1 25544U 98067A   20233.73843000 -.00002996  00000-0 -45975-4 0  9997
2 25544  51.6453  29.0063 0001485  60.4588  71.0712 15.49170160242027";

pub struct TleEntry {
    pub name: String,
    pub norad_id: u64,
    pub elements: Elements,
    pub constants: Constants,
}

impl TleEntry {
    pub fn from_lines(
        name: Option<String>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, GeometryError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        Ok(Self {
            name,
            norad_id: elements.norad_id,
            elements,
            constants,
        })
    }

    /// Parse exactly one 2- or 3-line element set.
    pub fn parse(tle: &str) -> Result<Self, GeometryError> {
        let lines: Vec<&str> = tle
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        match lines.as_slice() {
            [line1, line2] => Self::from_lines(None, line1, line2),
            [name, line1, line2] => Self::from_lines(Some(name.to_string()), line1, line2),
            _ => Err(GeometryError::InvalidTleFormat),
        }
    }
}

/// Load every element set in a file. Lines that do not belong to an
/// element set are skipped.
pub fn load_tle_file(path: &Path) -> Result<Vec<TleEntry>, GeometryError> {
    let content = fs::read_to_string(path)?;
    parse_multi_tle(&content)
        .into_iter()
        .map(|(name, line1, line2)| TleEntry::from_lines(name, &line1, &line2))
        .collect()
}

/// Pick an element set by name (case-insensitive) or NORAD id. Without a
/// selector the first entry wins.
pub fn select(entries: Vec<TleEntry>, selector: Option<&str>) -> Result<TleEntry, GeometryError> {
    let wanted = selector.map(str::trim);
    let mut iter = entries.into_iter();
    let found = match wanted {
        None => iter.next(),
        Some(s) => {
            let id = s.parse::<u64>().ok();
            iter.find(|e| Some(e.norad_id) == id || e.name.eq_ignore_ascii_case(s))
        }
    };
    found.ok_or_else(|| GeometryError::SatelliteNotFound(wanted.unwrap_or("*").to_string()))
}

fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
