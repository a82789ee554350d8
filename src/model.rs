use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr, sync::OnceLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("'{0}' is not a 'latitude,longitude' pair")]
    Malformed(String),

    #[error("'{0}' is not a decimal degree value")]
    NotANumber(String),

    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
}

/// A latitude/longitude pair in decimal degrees.
///
/// Both components are kept as the text they were entered or received as, so
/// a value like `48.85660` survives the round trip to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(deserialize_with = "degrees_as_text")]
    latitude: String,
    #[serde(deserialize_with = "degrees_as_text")]
    longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Result<Self, CoordinateError> {
        let latitude = latitude.into().trim().to_string();
        let longitude = longitude.into().trim().to_string();

        let lat = parse_degrees(&latitude)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        let lng = parse_degrees(&longitude)?;
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    /// Numeric form, used to centre a map. `None` if the backend handed us
    /// something that is not a number.
    pub fn degrees(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.parse::<f64>().ok()?;
        let lng = self.longitude.parse::<f64>().ok()?;
        Some((lat, lng))
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PAIR: OnceLock<Regex> = OnceLock::new();
        let pair = PAIR.get_or_init(|| {
            Regex::new(r"^\s*([^,\s]+)\s*,\s*([^,\s]+)\s*$")
                .expect("coordinate pattern is valid")
        });

        let caps = pair
            .captures(s)
            .ok_or_else(|| CoordinateError::Malformed(s.to_string()))?;
        Self::new(&caps[1], &caps[2])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Lat: {}, Long: {})", self.latitude, self.longitude)
    }
}

fn parse_degrees(text: &str) -> Result<f64, CoordinateError> {
    text.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| CoordinateError::NotANumber(text.to_string()))
}

// the backend stores whatever the client sent, which has been both strings and numbers
fn degrees_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected degrees as string or number, found {}",
            other
        ))),
    }
}

/// A validated question/answer/location triple.
///
/// Entries are only built by committing a complete draft (or decoded from the
/// backend), so their fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    question: String,
    answer: String,
    location: Coordinate,
}

impl QuestionEntry {
    pub(crate) fn new(question: String, answer: String, location: Coordinate) -> Self {
        Self {
            question,
            answer,
            location,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn location(&self) -> &Coordinate {
        &self.location
    }
}

/// Body of `POST /quiz/question`: one entry tagged with its quiz name.
#[derive(Debug, Serialize)]
pub struct QuestionRecord<'a> {
    pub name: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub location: &'a Coordinate,
}

impl<'a> QuestionRecord<'a> {
    pub fn new(name: &'a str, entry: &'a QuestionEntry) -> Self {
        Self {
            name,
            question: entry.question(),
            answer: entry.answer(),
            location: entry.location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuiz {
    pub quiz_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

impl PersistedQuiz {
    /// Where a map of this quiz is centred: its first question, if any.
    pub fn map_center(&self) -> Option<(f64, f64)> {
        self.questions.first().and_then(|q| q.location().degrees())
    }
}

/// Bearer credential handed out by `POST /auth/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_pair_and_keeps_text() {
        let c: Coordinate = "48.85660, 2.3522".parse().unwrap();
        assert_eq!(c.latitude(), "48.85660");
        assert_eq!(c.longitude(), "2.3522");
        assert_eq!(c.degrees(), Some((48.8566, 2.3522)));
    }

    #[test]
    fn pair_accepts_every_form_new_accepts() {
        let c: Coordinate = "1e-7, .5".parse().unwrap();
        assert_eq!(c, Coordinate::new("1e-7", ".5").unwrap());
        assert_eq!(c.degrees(), Some((1e-7, 0.5)));
        assert!(matches!(
            "48.8566 2.3522".parse::<Coordinate>(),
            Err(CoordinateError::Malformed(_))
        ));
        assert!(matches!(
            "north, 2".parse::<Coordinate>(),
            Err(CoordinateError::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        assert!(matches!(
            "paris".parse::<Coordinate>(),
            Err(CoordinateError::Malformed(_))
        ));
        assert!(matches!(
            "91,0".parse::<Coordinate>(),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinate::new("10", "-181"),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinate::new("NaN", "0"),
            Err(CoordinateError::NotANumber(_))
        ));
    }

    #[test]
    fn decodes_numeric_and_text_degrees() {
        let quiz: PersistedQuiz = serde_json::from_value(json!({
            "quizId": "q1",
            "userId": "u1",
            "username": "ada",
            "questions": [
                {"question": "Q", "answer": "A", "location": {"latitude": "57.7", "longitude": 11.97}}
            ]
        }))
        .unwrap();

        let location = quiz.questions[0].location();
        assert_eq!(location.latitude(), "57.7");
        assert_eq!(location.longitude(), "11.97");
        assert_eq!(quiz.map_center(), Some((57.7, 11.97)));
    }

    #[test]
    fn record_matches_wire_shape() {
        let entry = QuestionEntry::new(
            "Capital of France?".into(),
            "Paris".into(),
            Coordinate::new("48.8566", "2.3522").unwrap(),
        );
        let record = QuestionRecord::new("Geo Quiz", &entry);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "Geo Quiz",
                "question": "Capital of France?",
                "answer": "Paris",
                "location": {"latitude": "48.8566", "longitude": "2.3522"}
            })
        );
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("secret");
        assert_eq!(format!("{:?}", token), "Token(***)");
        assert_eq!(token.bearer(), "Bearer secret");
    }
}
