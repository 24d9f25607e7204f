use std::sync::LazyLock;

use regex::Regex;
use common::{CreateGameRequest, UpdatePlaytimeRequest};

static NUMERIC: LazyLock<Regex> =
     LazyLock::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("numeric pattern compiles"));

pub fn validate_title(title: &str) -> Result<(), String> {
     if title.trim().is_empty() {
          return Err("Title must not be empty".to_string());
     }
     Ok(())
}

pub fn validate_playtime(playtime: i32) -> Result<(), String> {
     if playtime < 0 {
          return Err("Playtime must be a non-negative number of minutes".to_string());
     }
     Ok(())
}

/// Genre and platform names share the same rule.
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
     if value.trim().is_empty() {
          return Err(format!("{} must not be empty", field));
     }
     Ok(())
}

pub fn validate_create_game_request(req: &CreateGameRequest) -> Result<(), String> {
     validate_title(&req.title)?;
     validate_playtime(req.playtime)?;
     Ok(())
}

pub fn validate_update_playtime_request(req: &UpdatePlaytimeRequest) -> Result<(), String> {
     validate_playtime(req.playtime)
}

pub fn parse_game_id(raw: &str) -> Result<i32, String> {
     raw.trim()
          .parse::<i32>()
          .map_err(|_| "Param id must be an integer number".to_string())
}

/// Normalizes a name filter from the query string. Blank values count as no
/// filter; numeric values are rejected since names are never matched by number.
pub fn validate_name_filter(param: &str, value: Option<String>) -> Result<Option<String>, String> {
     let Some(value) = value else {
          return Ok(None);
     };

     if value.is_empty() {
          return Ok(None);
     }

     if NUMERIC.is_match(value.trim()) {
          return Err(format!("Query param {} must be a string", param));
     }

     Ok(Some(value))
}

#[cfg(test)]
mod tests {
     use super::*;

     #[test]
     fn game_id_must_be_integer() {
          assert_eq!(parse_game_id("42"), Ok(42));
          assert_eq!(parse_game_id("-3"), Ok(-3));
          assert!(parse_game_id("banana").is_err());
          assert!(parse_game_id("1.5").is_err());
          assert!(parse_game_id("99999999999").is_err());
     }

     #[test]
     fn negative_playtime_rejected() {
          assert!(validate_playtime(0).is_ok());
          assert!(validate_playtime(9000).is_ok());
          assert!(validate_playtime(-1).is_err());
     }

     #[test]
     fn create_request_checks_title_then_playtime() {
          let req = CreateGameRequest {
               title: "   ".to_string(),
               playtime: -5,
               genre_id: 1,
               platform_id: 1,
          };
          assert_eq!(
               validate_create_game_request(&req),
               Err("Title must not be empty".to_string())
          );

          let req = CreateGameRequest { title: "Foo".to_string(), ..req };
          assert!(validate_create_game_request(&req).is_err());
     }

     #[test]
     fn numeric_filters_rejected() {
          assert!(validate_name_filter("genre", Some("42".to_string())).is_err());
          assert!(validate_name_filter("genre", Some("3.14".to_string())).is_err());
          assert_eq!(
               validate_name_filter("platform", Some("PS4".to_string())),
               Ok(Some("PS4".to_string()))
          );
     }

     #[test]
     fn blank_filter_is_no_filter() {
          assert_eq!(validate_name_filter("genre", None), Ok(None));
          assert_eq!(validate_name_filter("genre", Some(String::new())), Ok(None));
     }

     #[test]
     fn names_must_not_be_blank() {
          assert!(validate_name("Genre", "RPG").is_ok());
          assert_eq!(validate_name("Genre", " "), Err("Genre must not be empty".to_string()));
     }
}
