//! Generation of the workspace entry point and module descriptor.
//!
//! Plain placeholder substitution over fixed templates. Package and variable
//! names come from the CLI and the component directory name; the toolchain
//! version is detected at rebuild time.

/// Entry-point template mounting a single component.
const ENTRY_TEMPLATE: &str = include_str!("../../assets/templates/main.go.tmpl");

/// Module descriptor template for the staged workspace.
const DESCRIPTOR_TEMPLATE: &str = include_str!("../../assets/templates/go.mod.tmpl");

/// Render the `main.go` entry point for a staged component.
pub fn render_entry(package_name: &str, var_name: &str) -> String {
    ENTRY_TEMPLATE
        .replace("{{PackageName}}", package_name)
        .replace("{{VarName}}", var_name)
}

/// Render the `go.mod` descriptor for a staged component workspace.
pub fn render_descriptor(go_version: &str) -> String {
    DESCRIPTOR_TEMPLATE.replace("{{GoVersion}}", go_version)
}
