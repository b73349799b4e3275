//! GLSL ES 3.00 sources for the two full-screen passes.
//!
//! The constants and palette here are mirrored by [`crate::software`]; keep
//! them in step.

/// Oversized triangle covering the viewport, no vertex buffer needed.
pub const FULLSCREEN_VERTEX: &str = r#"#version 300 es
out vec2 v_uv;

void main() {
    vec2 pos = vec2(float((gl_VertexID & 1) << 2) - 1.0, float((gl_VertexID & 2) << 1) - 1.0);
    v_uv = pos * 0.5 + 0.5;
    gl_Position = vec4(pos, 0.0, 1.0);
}
"#;

pub const EFFECT_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_texture;
uniform float u_elapsed;
uniform vec2 u_seed;
uniform vec2 u_cursor;
uniform float u_ratio;
uniform float u_cleared;
uniform float u_theme;
uniform float u_decay;

in vec2 v_uv;
out vec4 frag_color;

const float GROW_SECONDS = 1.2;
const float MAX_RADIUS = 0.12;
const float FADE_STEP = 0.0039215686;
const float TAU = 6.2831853;

const vec3 LIGHT_CORE = vec3(0.10, 0.12, 0.35);
const vec3 LIGHT_EDGE = vec3(0.85, 0.25, 0.45);
const vec3 DARK_CORE = vec3(0.95, 0.80, 0.55);
const vec3 DARK_EDGE = vec3(0.35, 0.75, 0.95);

float bloom_ink(vec2 d) {
    if (u_elapsed >= GROW_SECONDS) {
        return 0.0;
    }
    float dist = length(d);
    float angle = atan(d.y, d.x);
    float petals = 5.0 + floor(u_seed.y * 4.0);
    float wobble = 1.0
        + 0.3 * sin(angle * petals + u_seed.x * TAU)
        + 0.1 * sin(angle * (2.0 * petals + 1.0) + u_seed.y * TAU);
    float radius = MAX_RADIUS * wobble * sqrt(u_elapsed / GROW_SECONDS);
    if (radius <= 0.0) {
        return 0.0;
    }
    return 1.0 - smoothstep(radius * 0.6, radius, dist);
}

void main() {
    if (u_cleared > 0.5) {
        frag_color = vec4(0.0);
        return;
    }
    vec4 prev = texture(u_texture, v_uv);
    prev.a = max(prev.a * u_decay - FADE_STEP, 0.0);

    vec2 d = v_uv - u_cursor;
    d.x *= u_ratio;
    float ink = bloom_ink(d);

    float t = clamp(length(d) / MAX_RADIUS, 0.0, 1.0);
    vec3 core = mix(LIGHT_CORE, DARK_CORE, u_theme);
    vec3 edge = mix(LIGHT_EDGE, DARK_EDGE, u_theme);
    vec3 color = mix(prev.rgb, mix(core, edge, t), ink);
    frag_color = vec4(color, max(prev.a, ink));
}
"#;

/// Plain display of the latest surface, premultiplied for the canvas.
pub const COMPOSITE_FRAGMENT: &str = r#"#version 300 es
precision mediump float;

uniform sampler2D u_texture;

in vec2 v_uv;
out vec4 frag_color;

void main() {
    vec4 c = texture(u_texture, v_uv);
    frag_color = vec4(c.rgb * c.a, c.a);
}
"#;
