use clap::{Parser, ValueEnum};
use nalgebra::Vector3;

use terrain::prelude::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Density,
    Vertex,
}

impl From<Mode> for SculptMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Density => SculptMode::Density,
            Mode::Vertex => SculptMode::Vertex,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML terrain config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Overrides the seed from the config
    #[arg(short, long)]
    seed: Option<u32>,

    /// The radius of chunks to generate around the origin
    #[arg(short, long, default_value_t = 1)]
    radius: u32,

    /// World-space impact point of a brush stroke, as `x,y,z`
    #[arg(long, value_parser = parse_vec3)]
    brush: Option<Vector3<f32>>,

    #[arg(long, default_value_t = 300.0)]
    brush_radius: f32,

    /// Signed stroke strength; negative digs
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    direction: f32,

    #[arg(long, value_enum, default_value_t = Mode::Density)]
    mode: Mode,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("bad component {p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.noise.seed = seed;
    }
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    log::info!("Generating terrain with radius {}...", args.radius);
    let mut grid = ChunkGrid::spawn(&config, args.radius)?;

    if let Some(point) = args.brush {
        // stands in for a ray cast: the brush lands wherever it was asked to
        let hit = grid.locate(&point).map(|chunk| TerrainHit {
            chunk,
            point,
            normal: Vector3::z(),
        });
        match hit {
            Some(hit) => {
                let stroke = BrushStroke::at_hit(&hit, args.brush_radius, args.direction, &config);
                let editor = TerraformEditor::new(args.mode.into());
                if grid.terraform(Some(hit), &stroke, &editor) {
                    log::info!("Applied {:?} stroke at {:?}", args.mode, point);
                } else {
                    log::warn!("Stroke at {:?} did not touch any terrain", point);
                }
            }
            None => log::warn!("Brush point {:?} is outside every chunk", point),
        }
    }

    for chunk in grid.iter() {
        let coords = chunk.coords();
        let mesh = chunk.mesh();
        log::info!(
            "Chunk ({}, {}): {} vertices, {} triangles",
            coords.x,
            coords.y,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }
    log::info!("Done! {} triangles across {} chunks", grid.triangle_count(), grid.len());
    Ok(())
}
