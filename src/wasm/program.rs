use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlUniformLocation};

use crate::error::{Result, RippleError, ShaderStage};

pub const VERTEX_POSITION: &str = "vertexPosition";
pub const HEIGHT_SAMPLER: &str = "heightSampler";
pub const BACKGROUND_SAMPLER: &str = "backgroundSampler";
/// Optional; shaders that ignore stamp placement may leave it out.
pub const STAMP_OFFSET: &str = "stampOffset";

/// How to treat a shader that lacks a required attribute or uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceCheck {
    Strict,
    /// Log each missing name once and skip its binding.
    Lenient,
}

impl InterfaceCheck {
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            InterfaceCheck::Strict
        } else {
            InterfaceCheck::Lenient
        }
    }
}

/// Locations the render passes bind through. `None` means the program does
/// not expose that name.
#[derive(Debug, Clone)]
pub struct ProgramInterface {
    pub vertex_position: Option<u32>,
    pub height_sampler: Option<WebGlUniformLocation>,
    pub background_sampler: Option<WebGlUniformLocation>,
    pub stamp_offset: Option<WebGlUniformLocation>,
}

struct ShaderLogs {
    program: String,
    vertex: String,
    fragment: String,
}

/// A linked program and the locations of its rendering interface.
pub struct ShaderProgram {
    program: WebGlProgram,
    interface: ProgramInterface,
}

impl ShaderProgram {
    pub fn handle(&self) -> &WebGlProgram {
        &self.program
    }

    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }

    pub fn link_status(&self, gl: &GL) -> bool {
        gl.get_program_parameter(&self.program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }
}

/// Compiles both stages, links them and resolves the rendering interface.
pub fn load_shader_program(
    gl: &GL,
    vertex_source: &str,
    fragment_source: &str,
    check: InterfaceCheck,
) -> Result<ShaderProgram> {
    let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = compile_stage(gl, ShaderStage::Fragment, fragment_source)?;

    let program = gl
        .create_program()
        .ok_or(RippleError::ResourceCreation("shader program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let logs = collect_logs(gl, &program, &vertex, &fragment);
        log::error!("program: {}", logs.program);
        log::error!("vertex: {}", logs.vertex);
        log::error!("fragment: {}", logs.fragment);
        return Err(RippleError::ShaderLink {
            program_log: logs.program,
            vertex_log: logs.vertex,
            fragment_log: logs.fragment,
        });
    }

    let interface = resolve_interface(gl, &program, check)?;
    Ok(ShaderProgram { program, interface })
}

fn compile_stage(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(RippleError::ResourceCreation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error".into());
        log::error!("{stage}: {log}");
        Err(RippleError::ShaderCompile { stage, log })
    }
}

fn collect_logs(
    gl: &GL,
    program: &WebGlProgram,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> ShaderLogs {
    ShaderLogs {
        program: gl.get_program_info_log(program).unwrap_or_default(),
        vertex: gl.get_shader_info_log(vertex).unwrap_or_default(),
        fragment: gl.get_shader_info_log(fragment).unwrap_or_default(),
    }
}

fn resolve_interface(
    gl: &GL,
    program: &WebGlProgram,
    check: InterfaceCheck,
) -> Result<ProgramInterface> {
    let vertex_position = match gl.get_attrib_location(program, VERTEX_POSITION) {
        -1 => {
            missing(check, RippleError::MissingAttribute(VERTEX_POSITION))?;
            None
        }
        location => Some(location as u32),
    };

    let uniform = |name: &'static str| -> Result<Option<WebGlUniformLocation>> {
        let location = gl.get_uniform_location(program, name);
        if location.is_none() {
            missing(check, RippleError::MissingUniform(name))?;
        }
        Ok(location)
    };
    let height_sampler = uniform(HEIGHT_SAMPLER)?;
    let background_sampler = uniform(BACKGROUND_SAMPLER)?;

    let stamp_offset = gl.get_uniform_location(program, STAMP_OFFSET);
    if stamp_offset.is_none() {
        log::debug!("program has no `{STAMP_OFFSET}` uniform; stamp stays at its default position");
    }

    Ok(ProgramInterface {
        vertex_position,
        height_sampler,
        background_sampler,
        stamp_offset,
    })
}

fn missing(check: InterfaceCheck, err: RippleError) -> Result<()> {
    match check {
        InterfaceCheck::Strict => Err(err),
        InterfaceCheck::Lenient => {
            log::warn!("{err}");
            Ok(())
        }
    }
}
