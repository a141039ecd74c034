use crate::domain::Draft;
use std::fs;

pub const DEFAULT_DRAFT_FILE: &str = "freight-request.json";

pub struct DraftRepository;

impl DraftRepository {
    pub fn save_draft(draft: &Draft, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(draft) {
            Ok(json) => {
                match fs::write(filename, &json) {
                    Ok(_) => Ok(filename.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    pub fn load_draft(filename: &str) -> Result<(Draft, String), String> {
        match fs::read_to_string(filename) {
            Ok(content) => {
                match serde_json::from_str::<Draft>(&content) {
                    Ok(draft) => Ok((draft, filename.to_string())),
                    Err(e) => Err(format!("Invalid draft file - {}", e)),
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }
}
