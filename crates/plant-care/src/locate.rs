/// Literal, case-insensitive lookup of a plant name in the guide text.
///
/// The snippet runs from the start of the first match to the first line break found at
/// least [`WINDOW_CHARS`] characters later, or to the end of the text.
use std::fmt;

use regex::RegexBuilder;

pub const NOT_FOUND_MESSAGE: &str = "No specific information found for this plant.";
pub const WINDOW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantInfo {
    Found(String),
    NotFound,
}

impl PlantInfo {
    pub fn as_str(&self) -> &str {
        match self {
            PlantInfo::Found(snippet) => snippet,
            PlantInfo::NotFound => NOT_FOUND_MESSAGE,
        }
    }
}

impl fmt::Display for PlantInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn locate_plant_info(plant_name: &str, text: &str) -> PlantInfo {
    if plant_name.is_empty() || text.is_empty() {
        return PlantInfo::NotFound;
    }

    // Escaped so the name is matched literally; offsets stay in `text`'s coordinates.
    let Ok(pattern) = RegexBuilder::new(&regex::escape(plant_name))
        .case_insensitive(true)
        .build()
    else {
        return PlantInfo::NotFound;
    };
    let Some(found) = pattern.find(text) else {
        return PlantInfo::NotFound;
    };

    let start = found.start();
    let end = text[start..]
        .char_indices()
        .nth(WINDOW_CHARS)
        .and_then(|(offset, _)| {
            let from = start + offset;
            text[from..].find('\n').map(|nl| from + nl)
        })
        .unwrap_or(text.len());

    PlantInfo::Found(text[start..end].trim().to_string())
}
