//! WGSL front end: parses and validates sources with naga and recovers the
//! vertex-input name → location table.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Entry point every vertex shader must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment shader must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

fn parse(source: &str, stage: naga::ShaderStage, entry: &str) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| Error::ShaderCompile(format!("WGSL parse error: {}", e.emit_to_string(source))))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| Error::ShaderCompile(format!("validation error: {e}")))?;

    if !module.entry_points.iter().any(|ep| ep.name == entry && ep.stage == stage) {
        return Err(Error::ShaderCompile(format!("missing {stage:?} entry point `{entry}`")));
    }
    Ok(module)
}

/// Checks that `source` is a valid fragment shader.
pub fn check_fragment(source: &str) -> Result<()> {
    parse(source, naga::ShaderStage::Fragment, FRAGMENT_ENTRY).map(|_| ())
}

/// Returns every `@location` input of the vertex entry point by name.
///
/// Inputs may be plain arguments or members of a struct argument.
pub fn vertex_inputs(source: &str) -> Result<HashMap<String, u32>> {
    let module = parse(source, naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
    let Some(entry) = module
        .entry_points
        .iter()
        .find(|ep| ep.name == VERTEX_ENTRY && ep.stage == naga::ShaderStage::Vertex)
    else {
        return Err(Error::ShaderCompile(format!("missing vertex entry point `{VERTEX_ENTRY}`")));
    };

    let mut inputs = HashMap::new();
    for arg in &entry.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (Some(naga::Binding::Location { location, .. }), _) => {
                if let Some(name) = &arg.name {
                    inputs.insert(name.clone(), *location);
                }
            }
            (None, naga::TypeInner::Struct { members, .. }) => {
                for member in members {
                    if let (Some(naga::Binding::Location { location, .. }), Some(name)) =
                        (&member.binding, &member.name)
                    {
                        inputs.insert(name.clone(), *location);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(inputs)
}
