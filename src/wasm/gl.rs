use web_sys::{
    WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::backend::RenderBackend;
use crate::error::{BloomError, Result};
use crate::shaders::{COMPOSITE_FRAGMENT, EFFECT_FRAGMENT, FULLSCREEN_VERTEX};
use crate::surfaces::{Surface, Viewport};
use crate::uniforms::EffectUniforms;

/// An RGBA8 texture with its own framebuffer.
pub struct GlSurface {
    texture: WebGlTexture,
    framebuffer: WebGlFramebuffer,
    viewport: Viewport,
}

impl Surface for GlSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

struct EffectProgram {
    program: WebGlProgram,
    elapsed: Option<WebGlUniformLocation>,
    seed: Option<WebGlUniformLocation>,
    cursor: Option<WebGlUniformLocation>,
    ratio: Option<WebGlUniformLocation>,
    cleared: Option<WebGlUniformLocation>,
    theme: Option<WebGlUniformLocation>,
}

pub struct GlBackend {
    gl: GL,
    effect: EffectProgram,
    composite: WebGlProgram,
    // Empty: the vertex shader derives positions from gl_VertexID.
    vao: WebGlVertexArrayObject,
    max_texture_size: u32,
}

impl GlBackend {
    pub fn new(gl: GL, decay: f32) -> Result<Self> {
        let program = link_program(&gl, FULLSCREEN_VERTEX, EFFECT_FRAGMENT)?;
        let effect = EffectProgram {
            elapsed: gl.get_uniform_location(&program, "u_elapsed"),
            seed: gl.get_uniform_location(&program, "u_seed"),
            cursor: gl.get_uniform_location(&program, "u_cursor"),
            ratio: gl.get_uniform_location(&program, "u_ratio"),
            cleared: gl.get_uniform_location(&program, "u_cleared"),
            theme: gl.get_uniform_location(&program, "u_theme"),
            program,
        };
        gl.use_program(Some(&effect.program));
        gl.uniform1i(gl.get_uniform_location(&effect.program, "u_texture").as_ref(), 0);
        gl.uniform1f(gl.get_uniform_location(&effect.program, "u_decay").as_ref(), decay);

        let composite = link_program(&gl, FULLSCREEN_VERTEX, COMPOSITE_FRAGMENT)?;
        gl.use_program(Some(&composite));
        gl.uniform1i(gl.get_uniform_location(&composite, "u_texture").as_ref(), 0);

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| BloomError::Js("createVertexArray returned null".into()))?;
        let max_texture_size = gl
            .get_parameter(GL::MAX_TEXTURE_SIZE)
            .ok()
            .and_then(|v| v.as_f64())
            .map_or(4096, |v| v as u32);

        Ok(Self {
            gl,
            effect,
            composite,
            vao,
            max_texture_size,
        })
    }

    fn draw_fullscreen(&self) {
        self.gl.bind_vertex_array(Some(&self.vao));
        self.gl.draw_arrays(GL::TRIANGLES, 0, 3);
        self.gl.bind_vertex_array(None);
    }
}

impl RenderBackend for GlBackend {
    type Surface = GlSurface;

    fn allocate(&mut self, viewport: Viewport) -> Result<GlSurface> {
        let gl = &self.gl;
        let fail = |reason: String| BloomError::SurfaceAllocation { viewport, reason };

        if viewport.width > self.max_texture_size || viewport.height > self.max_texture_size {
            return Err(fail(format!("MAX_TEXTURE_SIZE is {}", self.max_texture_size)));
        }

        let texture = gl
            .create_texture()
            .ok_or_else(|| fail("createTexture returned null".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        let upload = gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            viewport.width as i32,
            viewport.height as i32,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        );
        if let Err(err) = upload {
            gl.delete_texture(Some(&texture));
            return Err(fail(format!("{err:?}")));
        }
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.bind_texture(GL::TEXTURE_2D, None);

        let Some(framebuffer) = gl.create_framebuffer() else {
            gl.delete_texture(Some(&texture));
            return Err(fail("createFramebuffer returned null".into()));
        };
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        if status == GL::FRAMEBUFFER_COMPLETE {
            gl.viewport(0, 0, viewport.width as i32, viewport.height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(GL::COLOR_BUFFER_BIT);
        }
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);

        if status != GL::FRAMEBUFFER_COMPLETE {
            gl.delete_framebuffer(Some(&framebuffer));
            gl.delete_texture(Some(&texture));
            return Err(fail(format!("framebuffer incomplete (0x{status:x})")));
        }

        Ok(GlSurface {
            texture,
            framebuffer,
            viewport,
        })
    }

    fn release(&mut self, surface: GlSurface) {
        self.gl.delete_framebuffer(Some(&surface.framebuffer));
        self.gl.delete_texture(Some(&surface.texture));
    }

    fn effect_pass(&mut self, source: &GlSurface, target: &mut GlSurface, uniforms: &EffectUniforms) {
        let gl = &self.gl;
        let fx = &self.effect;

        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&target.framebuffer));
        gl.viewport(0, 0, target.viewport.width as i32, target.viewport.height as i32);
        gl.use_program(Some(&fx.program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&source.texture));

        gl.uniform1f(fx.elapsed.as_ref(), uniforms.elapsed);
        gl.uniform2f(fx.seed.as_ref(), uniforms.seed[0], uniforms.seed[1]);
        gl.uniform2f(fx.cursor.as_ref(), uniforms.cursor[0], uniforms.cursor[1]);
        gl.uniform1f(fx.ratio.as_ref(), uniforms.aspect_ratio);
        gl.uniform1f(fx.cleared.as_ref(), uniforms.cleared);
        gl.uniform1f(fx.theme.as_ref(), uniforms.theme);

        self.draw_fullscreen();
    }

    fn composite_pass(&mut self, latest: &GlSurface) {
        let gl = &self.gl;
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&self.composite));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&latest.texture));
        self.draw_fullscreen();
        gl.bind_texture(GL::TEXTURE_2D, None);
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| BloomError::ShaderCompile("createShader returned null".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(BloomError::ShaderCompile(log))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| BloomError::ProgramLink("createProgram returned null".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders stay alive through the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(BloomError::ProgramLink(log))
    }
}
