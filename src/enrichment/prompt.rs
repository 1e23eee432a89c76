use crate::{data::types::SongFeatures, error::ServiceError};

/// Separator between title and artist in a song name
pub const SONG_SEPARATOR: &str = " - ";

/// Split "Title - Artist" on the first separator into trimmed parts
///
/// Returns `None` when the separator is absent.
pub fn split_song_name(song_name: &str) -> Option<(String, String)> {
    let (title, artist) = song_name.split_once(SONG_SEPARATOR)?;
    Some((title.trim().to_string(), artist.trim().to_string()))
}

/// Instruction asking the model for a bare JSON feature object
pub fn build_feature_prompt(title: &str, artist: &str) -> String {
    format!(
        r#"You are an expert music analyst. Given the following song details:
Song Title: "{title}"
Artist: "{artist}"
Please provide a JSON object with the following keys:
- "bpm": a number representing the song's tempo in BPM,
- "danceability": a number between 0.0 and 1.0 indicating how danceable the song is,
- "energy": a number between 0.0 and 1.0 indicating the energy level of the song,
- "mood": a short text description of the overall mood of the song,
- "genre": a general genre of the song.
Only return the JSON object without any additional commentary."#
    )
}

/// Parse model output into validated features
///
/// Tolerates markdown code fences and leading/trailing chatter around a
/// single JSON object. Numeric fields may arrive as numbers or numeric
/// strings.
pub fn parse_feature_response(content: &str) -> Result<SongFeatures, ServiceError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }

    let json = extract_json_object(content)
        .ok_or_else(|| ServiceError::InvalidResponse(format!("no JSON object in: {}", truncate(content))))?;

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ServiceError::InvalidResponse("expected a JSON object".to_string()))?;

    let features = SongFeatures {
        tempo: number_field(object, &["bpm", "tempo"])?,
        danceability: number_field(object, &["danceability"])?,
        energy: number_field(object, &["energy"])?,
        mood: text_field(object, "mood"),
        genre: text_field(object, "genre"),
    };

    features.validate()?;
    Ok(features)
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn number_field(
    object: &serde_json::Map<String, serde_json::Value>,
    keys: &[&str],
) -> Result<Option<f64>, ServiceError> {
    let Some((key, value)) = keys.iter().find_map(|k| object.get(*k).map(|v| (*k, v))) else {
        return Ok(None);
    };

    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            ServiceError::InvalidFeature { field: key.to_string(), value: s.clone() }
        }),
        other => Err(ServiceError::InvalidFeature {
            field: key.to_string(),
            value: other.to_string(),
        }),
    }
}

fn text_field(object: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Array(items) => {
            let joined: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!joined.is_empty()).then(|| joined.join(", "))
        }
        _ => None,
    }
}

fn truncate(content: &str) -> String {
    content.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_separator() {
        assert_eq!(
            split_song_name("Bohemian Rhapsody - Queen"),
            Some(("Bohemian Rhapsody".to_string(), "Queen".to_string()))
        );
        assert_eq!(
            split_song_name("Song - Artist - Live"),
            Some(("Song".to_string(), "Artist - Live".to_string()))
        );
        assert_eq!(split_song_name("Bohemian Rhapsody"), None);
        assert_eq!(split_song_name("AC-DC"), None);
    }

    #[test]
    fn test_prompt_names_song_and_keys() {
        let prompt = build_feature_prompt("Titanium", "David Guetta");
        assert!(prompt.contains("Song Title: \"Titanium\""));
        assert!(prompt.contains("Artist: \"David Guetta\""));
        for key in ["\"bpm\"", "\"danceability\"", "\"energy\"", "\"mood\"", "\"genre\""] {
            assert!(prompt.contains(key), "prompt missing {}", key);
        }
        assert!(prompt.contains("without any additional commentary"));
    }

    #[test]
    fn test_parse_plain_object() {
        let features = parse_feature_response(
            r#"{"bpm": 126, "danceability": 0.6, "energy": 0.79, "mood": "euphoric", "genre": "EDM"}"#,
        )
        .unwrap();

        assert_eq!(features.tempo, Some(126.0));
        assert_eq!(features.danceability, Some(0.6));
        assert_eq!(features.mood.as_deref(), Some("euphoric"));
    }

    #[test]
    fn test_parse_fenced_object_with_string_numbers() {
        let content = "Here you go:\n```json\n{\"tempo\": \"98\", \"energy\": \"0.4\", \"genre\": [\"soul\", \"r&b\"]}\n```";
        let features = parse_feature_response(content).unwrap();

        assert_eq!(features.tempo, Some(98.0));
        assert_eq!(features.energy, Some(0.4));
        assert_eq!(features.danceability, None);
        assert_eq!(features.genre.as_deref(), Some("soul, r&b"));
    }

    #[test]
    fn test_parse_empty_object_is_empty_record() {
        let features = parse_feature_response("{}").unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_feature_response("   "), Err(ServiceError::EmptyResponse));
        assert!(matches!(
            parse_feature_response("I cannot help with that."),
            Err(ServiceError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_feature_response(r#"{"bpm": 120, "energy": 85}"#),
            Err(ServiceError::InvalidFeature { .. })
        ));
        assert!(matches!(
            parse_feature_response(r#"{"bpm": "fast"}"#),
            Err(ServiceError::InvalidFeature { .. })
        ));
    }
}
