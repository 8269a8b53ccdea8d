//! Offline WGSL checks run before any GPU object exists.
//!
//! wgpu reports shader problems through its uncaptured-error handler, which
//! panics by default. Running the source through naga up front turns those
//! problems into a [`ShaderError`] the caller can report and abort on.

use naga::valid::{Capabilities, ValidationFlags, Validator};

/// What a render pipeline expects from one WGSL module.
#[derive(Debug, Copy, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    /// Shader locations supplied by the pipeline's vertex buffer layouts.
    pub attribute_locations: &'a [u32],
}

/// Startup failure of a shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// WGSL did not parse or did not pass validation.
    #[error("shader `{label}` failed to compile:\n{message}")]
    Compile { label: String, message: String },

    /// Stages do not fit together or do not fit the vertex layout.
    #[error("shader `{label}` failed to link: {reason}")]
    Link { label: String, reason: LinkError },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("missing {stage:?} entry point `{name}`")]
    MissingEntryPoint { stage: naga::ShaderStage, name: String },

    #[error("fragment input @location({0}) is not written by the vertex stage")]
    UnmatchedVarying(u32),

    #[error("vertex input @location({0}) has no vertex buffer attribute")]
    UnboundAttribute(u32),
}

/// Parses, validates and links `desc`.
///
/// Failures are logged at `error` level before being returned.
pub fn validate_program(desc: &ProgramDesc<'_>) -> Result<(), ShaderError> {
    let result = compile(desc).and_then(|module| {
        link(&module, desc).map_err(|reason| ShaderError::Link {
            label: desc.label.to_string(),
            reason,
        })
    });

    match &result {
        Ok(()) => log::debug!("shader `{}` validated", desc.label),
        Err(e) => log::error!("{e}"),
    }

    result
}

fn compile(desc: &ProgramDesc<'_>) -> Result<naga::Module, ShaderError> {
    let compile_error = |message: String| ShaderError::Compile {
        label: desc.label.to_string(),
        message,
    };

    let module = naga::front::wgsl::parse_str(desc.source)
        .map_err(|e| compile_error(e.emit_to_string(desc.source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(e.as_inner().to_string()))?;

    Ok(module)
}

fn link(module: &naga::Module, desc: &ProgramDesc<'_>) -> Result<(), LinkError> {
    let vertex = find_entry(module, naga::ShaderStage::Vertex, desc.vertex_entry)?;
    let fragment = find_entry(module, naga::ShaderStage::Fragment, desc.fragment_entry)?;

    for location in input_locations(module, &vertex.function) {
        if !desc.attribute_locations.contains(&location) {
            return Err(LinkError::UnboundAttribute(location));
        }
    }

    let varyings = output_locations(module, &vertex.function);
    for location in input_locations(module, &fragment.function) {
        if !varyings.contains(&location) {
            return Err(LinkError::UnmatchedVarying(location));
        }
    }

    Ok(())
}

fn find_entry<'m>(
    module: &'m naga::Module,
    stage: naga::ShaderStage,
    name: &str,
) -> Result<&'m naga::EntryPoint, LinkError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
        .ok_or_else(|| LinkError::MissingEntryPoint { stage, name: name.to_string() })
}

fn input_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn output_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    let mut out = Vec::new();
    if let Some(result) = &function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Walks a binding (or, for unbound structs, its members) collecting `@location`s.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(*location),
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}
