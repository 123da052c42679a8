#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| (*a).to_string()).collect()
}

#[test]
fn options_and_positionals_in_any_order() {
    let (options, positional) =
        Options::parse(&args(&["-o", "out.rs", "page.stencil", "--config", "site.json"]));
    assert_eq!(options.output, Some(PathBuf::from("out.rs")));
    assert_eq!(options.config, Some(PathBuf::from("site.json")));
    assert_eq!(positional, vec!["page.stencil"]);
}

#[test]
fn config_with_equals_sign() {
    let (options, positional) = Options::parse(&args(&["--config=site.json", "templates"]));
    assert_eq!(options.config, Some(PathBuf::from("site.json")));
    assert_eq!(options.output, None);
    assert_eq!(positional, vec!["templates"]);
}

#[test]
fn flag_without_value_is_positional() {
    let (options, positional) = Options::parse(&args(&["page.stencil", "-o"]));
    assert_eq!(options.output, None);
    assert_eq!(positional, vec!["page.stencil", "-o"]);
}

#[test]
fn no_config_means_defaults() {
    let (options, _) = Options::parse(&[]);
    assert_eq!(options.load_config(), Config::default());
}

#[test]
fn config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.json");
    std::fs::write(&path, r#"{"cache_namespace": "site"}"#).unwrap();
    let (options, _) = Options::parse(&[format!("--config={}", path.display())]);
    assert_eq!(options.load_config().cache_namespace, "site");
}

#[test]
fn template_names_are_file_stems() {
    assert_eq!(template_name("templates/page.stencil"), "page");
    assert_eq!(template_name("card"), "card");
}
