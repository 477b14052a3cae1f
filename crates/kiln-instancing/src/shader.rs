use glam::Vec3;
use kiln_engine::gfx::ProgramFormat;

/// Scale applied to the base sphere before the instance offset.
pub const BASE_MESH_SCALE: f32 = 4.0;

/// View-space direction the light travels (from the eye into the scene).
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, -1.0);

pub const INSTANCE_POSITION: &str = "vInstancePosition";
pub const INSTANCE_COLOR: &str = "vInstanceColor";

const SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

const BASE_MESH_SCALE: f32 = {BASE_MESH_SCALE};
const LIGHT_DIRECTION: vec3<f32> = vec3<f32>({LIGHT_DIRECTION});

struct VertexIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) vInstancePosition: vec3<f32>,
    @location(3) vInstanceColor: vec3<f32>,
};

struct VertexOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var out: VertexOut;
    let world = BASE_MESH_SCALE * v.position + v.vInstancePosition;
    out.clip_position = camera.view_proj * vec4<f32>(world, 1.0);
    out.color = v.vInstanceColor;
    out.normal = (camera.normal_matrix * vec4<f32>(v.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(f: VertexOut) -> @location(0) vec4<f32> {
    let diffuse = max(dot(normalize(f.normal), -LIGHT_DIRECTION), 0.0);
    return vec4<f32>(f.color * diffuse, 1.0);
}
"#;

/// WGSL source with the Rust-side constants substituted.
pub fn source() -> String {
    let l = LIGHT_DIRECTION;
    SOURCE
        .replace("{BASE_MESH_SCALE}", &wgsl_float(BASE_MESH_SCALE))
        .replace(
            "{LIGHT_DIRECTION}",
            &format!("{}, {}, {}", wgsl_float(l.x), wgsl_float(l.y), wgsl_float(l.z)),
        )
}

/// Program description: source plus the vertex inputs it declares.
pub fn program_format() -> ProgramFormat {
    ProgramFormat::new(source())
        .label("instance grid program")
        .vertex_input("position", 0)
        .vertex_input("normal", 1)
        .vertex_input(INSTANCE_POSITION, 2)
        .vertex_input(INSTANCE_COLOR, 3)
}

/// Formats `v` as a WGSL float literal (always with a decimal point).
fn wgsl_float(v: f32) -> String {
    format!("{v:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_substituted() {
        let src = source();
        assert!(!src.contains("{BASE_MESH_SCALE}"));
        assert!(!src.contains("{LIGHT_DIRECTION}"));
        assert!(src.contains("const BASE_MESH_SCALE: f32 = 4.0;"));
        assert!(src.contains("vec3<f32>(0.0, 0.0, -1.0)"));
    }

    #[test]
    fn declared_inputs_match_shader_locations() {
        let format = program_format();
        assert_eq!(format.inputs().len(), 4);
        for input in format.inputs() {
            let decl = format!("@location({}) {}: vec3<f32>", input.location, input.name);
            assert!(format.source().contains(&decl), "missing `{decl}`");
        }
    }

    #[test]
    fn wgsl_floats_keep_decimal_point() {
        assert_eq!(wgsl_float(4.0), "4.0");
        assert_eq!(wgsl_float(-1.0), "-1.0");
        assert_eq!(wgsl_float(0.25), "0.25");
    }
}
