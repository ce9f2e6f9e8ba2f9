//! translate-cli - query translation resources from the command line
//!
//! Usage:
//!   translate-cli translate <identifier> [args...] [--lang xx]
//!   translate-cli list <and|or> <item>... [--lang xx]
//!   translate-cli export
//!   translate-cli validate <lang>
//!   translate-cli reverse <text> [--lang xx]
//!
//! Environment variables (all optional):
//! - DEFAULT_LANGUAGE (defaults to en)
//! - TRANSLATION_DIRS (colon-separated, defaults to lang)
//! - CLIENT_EXPORT_KEYS (comma-separated identifiers for `export`)

use anyhow::{bail, Context, Result};
use tracing::info;
use translation_resolver::config::Config;
use translation_resolver::i18n::{
    FormatArg, JsonFileSource, StaticKeys, TranslationValidator, Translator, FALLBACK_LANGUAGE,
};

const USAGE: &str =
    "usage: translate-cli <translate|list|export|validate|reverse> [args...] [--lang xx]";

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_resolver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let (language, args) = split_language_flag(std::env::args().skip(1).collect())?;

    let translator = Translator::new(
        JsonFileSource::new(),
        config.clone(),
        config.translation_dirs.clone(),
    );
    if let Some(language) = language.as_deref() {
        translator.set_current_language(Some(language));
    }
    info!(
        "Using language '{}' from {:?}",
        translator.current_language(),
        translator.directories()
    );

    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    match command.as_str() {
        "translate" => {
            let Some((identifier, params)) = rest.split_first() else {
                bail!("usage: translate-cli translate <identifier> [args...]");
            };
            let params: Vec<FormatArg> = params.iter().map(FormatArg::from).collect();
            println!("{}", translator.translate_with(identifier, &params, None)?);
        }
        "list" => {
            let Some((kind, items)) = rest.split_first() else {
                bail!("usage: translate-cli list <and|or> <item>...");
            };
            let listing = match kind.as_str() {
                "and" => translator.create_and_listing(items, None)?,
                "or" => translator.create_or_listing(items, None)?,
                other => bail!("unknown list type '{}', expected 'and' or 'or'", other),
            };
            println!("{listing}");
        }
        "export" => {
            translator.register_client_keys(StaticKeys(config.client_export_keys.clone()));
            println!("{}", translator.client_export_script()?);
        }
        "validate" => {
            let target = rest
                .first()
                .context("usage: translate-cli validate <lang>")?;
            translator.set_current_language(Some(FALLBACK_LANGUAGE));
            let reference = translator.all_translations()?;
            translator.set_current_language(Some(target.as_str()));
            let candidate = translator.all_translations()?;

            let report = TranslationValidator::validate_tables(&reference, &candidate);
            for error in &report.errors {
                println!("error: {error}");
            }
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            info!(
                "Validated '{}': {} error(s), {} warning(s)",
                target,
                report.errors.len(),
                report.warnings.len()
            );
            if report.has_errors() {
                bail!("translation '{}' has errors", target);
            }
        }
        "reverse" => {
            let text = rest.join(" ");
            match translator.find_translation_key_for_translation(&text)? {
                Some(identifier) => println!("{identifier}"),
                None => bail!("no translation matches '{}'", text),
            }
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    info!(
        "Metrics: {}",
        serde_json::to_string(&translator.metrics().report())?
    );
    Ok(())
}

/// Remove `--lang xx` (or `--lang=xx`) from the arguments.
fn split_language_flag(args: Vec<String>) -> Result<(Option<String>, Vec<String>)> {
    let mut language = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--lang" {
            language = Some(iter.next().context("--lang needs a value")?);
        } else if let Some(value) = arg.strip_prefix("--lang=") {
            language = Some(value.to_string());
        } else {
            rest.push(arg);
        }
    }

    Ok((language, rest))
}
