use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expand `$VAR` and `${VAR}` references from the environment.
/// Unset variables expand to an empty string.
fn expand_env_vars(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut rest = input;

  while let Some(pos) = rest.find('$') {
    out.push_str(&rest[..pos]);
    let after = &rest[pos + 1..];

    if let Some(braced) = after.strip_prefix('{') {
      if let Some(end) = braced.find('}') {
        out.push_str(&std::env::var(&braced[..end]).unwrap_or_default());
        rest = &braced[end + 1..];
        continue;
      }
      out.push('$');
      rest = after;
      continue;
    }

    let len = after
      .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
      .unwrap_or(after.len());
    if len == 0 {
      out.push('$');
    } else {
      out.push_str(&std::env::var(&after[..len]).unwrap_or_default());
    }
    rest = &after[len..];
  }

  out.push_str(rest);
  out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default = "default_racing")]
  pub racing: DatabaseSection,
  #[serde(default = "default_sports")]
  pub sports: DatabaseSection,
  /// Insert fixture rows into empty catalogs on startup
  #[serde(default)]
  pub seed: bool,
  #[serde(default)]
  pub logging: LoggingSection,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      server: ServerSection::default(),
      racing: default_racing(),
      sports: default_sports(),
      seed: false,
      logging: LoggingSection::default(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Use ["*"] (or leave empty) for permissive CORS
  #[serde(default)]
  pub cors_origins: Vec<String>,
}

fn default_host() -> String {
  "127.0.0.1".into()
}

fn default_port() -> u16 {
  8000
}

impl Default for ServerSection {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      cors_origins: Vec::new(),
    }
  }
}

/// Location of one catalog's SQLite database. `:memory:` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
  pub path: String,
}

fn default_racing() -> DatabaseSection {
  DatabaseSection {
    path: "data/racing.db".into(),
  }
}

fn default_sports() -> DatabaseSection {
  DatabaseSection {
    path: "data/sports.db".into(),
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
  #[serde(default = "default_level")]
  pub level: String,
}

fn default_level() -> String {
  "info".into()
}

impl Default for LoggingSection {
  fn default() -> Self {
    Self {
      level: default_level(),
    }
  }
}

impl ServerConfig {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
    let content = std::fs::read_to_string(&path)?;
    Self::from_yaml(&content)
  }

  pub fn from_yaml(content: &str) -> Result<Self, anyhow::Error> {
    let expanded = expand_env_vars(content);
    Ok(serde_yaml::from_str(&expanded)?)
  }

  pub fn find_and_load() -> Result<Option<Self>, anyhow::Error> {
    for p in ["sportsbook.yaml", "sportsbook.yml"] {
      if Path::new(p).exists() {
        tracing::info!("Loading config from {}", p);
        return Ok(Some(Self::from_file(p)?));
      }
    }
    Ok(None)
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}
