use std::fs;

fn main() {
    // The bundled config is parsed at runtime with a silent fallback, so it
    // has to be right here.
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("Invalid default_config.toml: {e}"));

    for section in ["render", "search"] {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{section}] table");
        }
    }

    let mode = table["render"].get("mode").and_then(toml::Value::as_str);
    if !matches!(mode, Some("html" | "plain-document")) {
        panic!("default_config.toml has an unknown render.mode: {mode:?}");
    }
}
