//! Terminal commands.
//!
//! One command per input line. Arguments are separated by whitespace;
//! double quotes group words, so `create title="Blue Mug" ...` works.

use inventory_core::validation::{LoginForm, ProductForm};
use inventory_core::ProductId;

use crate::error::{AppError, AppResult};

pub const HELP: &str = "\
Commands:
  go <path>                  open a route, e.g. go /products?page=2&limit=5
  <path>                     same as go
  next | prev                page through the product list
  fav <id>                   toggle a product in favorites
  login <email> <password>   log in
  logout                     log out
  create title=.. price=.. category=.. image=..
                             create a product
  refresh                    reload the current screen
  help                       show this text
  quit                       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Next,
    Previous,
    Favorite(ProductId),
    Login(LoginForm),
    Logout,
    Create(ProductForm),
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Whether the command only moves between screens, so a newer command
    /// may abandon it.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Command::Go(_) | Command::Next | Command::Previous | Command::Refresh
        )
    }

    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> AppResult<Option<Command>> {
        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            (path, []) if path.starts_with('/') => Command::Go(path.to_string()),
            ("go", [path]) => Command::Go(path.clone()),
            ("next", []) => Command::Next,
            ("prev" | "previous", []) => Command::Previous,
            ("fav", [id]) => Command::Favorite(ProductId::parse(id)?),
            ("login", [email, password]) => Command::Login(LoginForm {
                email: email.clone(),
                password: password.clone(),
            }),
            ("logout", []) => Command::Logout,
            ("create", fields) => Command::Create(product_form(fields)?),
            ("refresh", []) => Command::Refresh,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            (name, _) => {
                return Err(AppError::bad_command(format!(
                    "Unknown command or wrong arguments: {}",
                    name
                )))
            }
        };
        Ok(Some(command))
    }
}

fn product_form(fields: &[String]) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| AppError::bad_command(format!("Expected name=value, got {}", field)))?;
        let slot = match name {
            "title" => &mut form.title,
            "price" => &mut form.price,
            "category" => &mut form.category,
            "image" | "imageUrl" => &mut form.image_url,
            other => return Err(AppError::bad_command(format!("Unknown field: {}", other))),
        };
        *slot = value.to_string();
    }
    Ok(form)
}

fn split_words(line: &str) -> AppResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(AppError::bad_command("Unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_navigation_commands() {
        assert_eq!(
            Command::parse("go /products?page=2&limit=5").unwrap(),
            Some(Command::Go("/products?page=2&limit=5".into()))
        );
        assert_eq!(
            Command::parse("/products/3").unwrap(),
            Some(Command::Go("/products/3".into()))
        );
        assert_eq!(Command::parse("  next ").unwrap(), Some(Command::Next));
        assert_eq!(Command::parse("prev").unwrap(), Some(Command::Previous));
        assert_eq!(Command::parse("").unwrap(), None);
    }

    #[test]
    fn test_login_and_fav() {
        assert_eq!(
            Command::parse("login ana@example.com s3cret").unwrap(),
            Some(Command::Login(LoginForm {
                email: "ana@example.com".into(),
                password: "s3cret".into(),
            }))
        );
        assert_eq!(
            Command::parse("fav 7").unwrap(),
            Some(Command::Favorite(ProductId::from(7)))
        );
    }

    #[test]
    fn test_create_with_quoted_title() {
        let parsed = Command::parse(
            r#"create title="Blue Mug" price=12.50 category=kitchen image=https://img.example.com/m.png"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            Some(Command::Create(ProductForm {
                title: "Blue Mug".into(),
                price: "12.50".into(),
                category: "kitchen".into(),
                image_url: "https://img.example.com/m.png".into(),
            }))
        );
    }

    #[test]
    fn test_only_navigation_may_be_abandoned() {
        assert!(Command::Go("/".into()).is_navigation());
        assert!(Command::Next.is_navigation());
        assert!(Command::Refresh.is_navigation());
        assert!(!Command::Logout.is_navigation());
        assert!(!Command::Login(LoginForm::default()).is_navigation());
        assert!(!Command::Create(ProductForm::default()).is_navigation());
    }

    #[test]
    fn test_bad_commands() {
        for line in ["dance", "login only-email", "create colour=red", "go \"/x"] {
            let err = Command::parse(line).unwrap_err();
            assert_eq!(err.code, ErrorCode::BadCommand, "{}", line);
        }
    }
}
