//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AuthSettings;
use crate::document::ApiDocument;
use crate::error::{Error, Result};
use crate::interceptor::Authentication;
use crate::registry::SchemeRegistry;
use crate::resolver::RequirementResolver;
use crate::types::HttpMethod;
use reqwest::{Method, Request};
use serde_json::{json, Map, Value};
use url::Url;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let message = match &self.cli.command {
            Commands::Schemes => self.schemes()?,
            Commands::Resolve { path, method } => self.resolve(path, method)?,
            Commands::Decorate { path, method, url } => {
                self.decorate(path, method, url.as_deref()).await?
            }
        };

        self.output_message(&message);
        Ok(())
    }

    /// Load the OpenAPI document
    fn load_document(&self) -> Result<ApiDocument> {
        let path = self
            .cli
            .document
            .as_ref()
            .ok_or_else(|| Error::config("OpenAPI document not specified (use -d flag)"))?;
        ApiDocument::load(path)
    }

    /// Load authentication settings
    fn load_settings(&self) -> Result<AuthSettings> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Settings file not specified (use -C flag)"))?;
        AuthSettings::load(path)
    }

    /// List declared security schemes
    fn schemes(&self) -> Result<Value> {
        let document = self.load_document()?;
        let registry = SchemeRegistry::new(document.schemes);

        let mut schemes = Map::new();
        for (name, scheme) in registry.iter() {
            schemes.insert(name.to_string(), serde_json::to_value(scheme)?);
        }

        Ok(json!({
            "type": "SCHEMES",
            "count": registry.len(),
            "schemes": schemes,
        }))
    }

    /// Show the requirement alternatives of one operation
    fn resolve(&self, path: &str, method: &str) -> Result<Value> {
        let method: HttpMethod = method.parse()?;
        let document = self.load_document()?;
        let resolver = RequirementResolver::new(document.path_requirements, document.security);

        let alternatives = resolver.resolve(path, method)?;

        Ok(json!({
            "type": "REQUIREMENTS",
            "path": path,
            "method": method,
            "alternatives": alternatives,
        }))
    }

    /// Decorate a request and show what would be sent
    async fn decorate(&self, path: &str, method: &str, url: Option<&str>) -> Result<Value> {
        let method: HttpMethod = method.parse()?;
        let settings = self.load_settings()?;
        let url = match url {
            Some(url) => Url::parse(url)?,
            None => settings.parsed_base_uri()?.join(path.trim_start_matches('/'))?,
        };

        let auth = Authentication::new(settings, self.load_document()?)?;
        let request = auth
            .decorate(Request::new(Method::from(method), url), path)
            .await?;

        let mut headers = Map::new();
        for (name, value) in request.headers() {
            let value = value
                .to_str()
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            headers.insert(name.to_string(), Value::String(value.to_string()));
        }

        Ok(json!({
            "type": "REQUEST",
            "method": request.method().as_str(),
            "url": request.url().as_str(),
            "headers": headers,
        }))
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
