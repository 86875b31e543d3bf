//! Bake tool binary
//!
//! Examples:
//!   vista-bake project photo.jpg pano.png --hfov 70 --yaw 30
//!   vista-bake blend-edges depth.png depth_seamless.png --distance 32
//!   vista-bake save --root site/environments --name "Cave" --color pano.png --depth depth.png

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image::DynamicImage;

use vista_asset::EnvironmentStore;
use vista_bake::{
    interpolate_edges, map_equirectangular, read_image, save_environments, write_image, BakeResult,
    Projection,
};

#[derive(Parser, Debug)]
#[command(name = "vista-bake", version)]
#[command(about = "Prepare equirectangular environments for the Vista viewer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place a perspective image on an equirectangular canvas
    Project {
        input: PathBuf,
        output: PathBuf,

        /// Horizontal field of view in degrees
        #[arg(long, default_value_t = 90.0)]
        hfov: f32,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        yaw: f32,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pitch: f32,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        roll: f32,

        /// Output width; height is half
        #[arg(long, default_value_t = 4096)]
        width: u32,
    },

    /// Blend the left and right edges so the seam closes
    BlendEdges {
        input: PathBuf,
        output: PathBuf,

        /// Blend ramp width in pixels
        #[arg(short, long, default_value_t = 16)]
        distance: u32,
    },

    /// Save textures (and depth maps) as new environments
    Save {
        /// environments/ directory to save into
        #[arg(long, default_value = "environments")]
        root: PathBuf,

        /// Base name; empty uses the current time
        #[arg(short, long, default_value = "")]
        name: String,

        /// Color texture, repeat for a batch
        #[arg(short, long, required = true)]
        color: Vec<PathBuf>,

        /// Depth map, one per color texture
        #[arg(short, long)]
        depth: Vec<PathBuf>,

        /// Port the environments are served on
        #[arg(short, long, default_value_t = 4443)]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(cli.command).map_err(|e| {
        log::error!("{}", e);
        e.into()
    })
}

fn run(command: Command) -> BakeResult<()> {
    match command {
        Command::Project {
            input,
            output,
            hfov,
            yaw,
            pitch,
            roll,
            width,
        } => {
            let projection = Projection {
                hfov,
                yaw,
                pitch,
                roll,
                output_width: width,
            };
            let image = read_image(&input)?;
            let projected = map_equirectangular(&image, &projection)?;
            write_image(&DynamicImage::ImageRgba32F(projected), &output)?;
            log::info!("Wrote {:?}", output);
        }

        Command::BlendEdges {
            input,
            output,
            distance,
        } => {
            let mut image = read_image(&input)?.to_rgba32f();
            interpolate_edges(&mut image, distance);
            write_image(&DynamicImage::ImageRgba32F(image), &output)?;
            log::info!("Wrote {:?}", output);
        }

        Command::Save {
            root,
            name,
            color,
            depth,
            port,
        } => {
            let store = EnvironmentStore::new(root);
            let record = save_environments(&store, &name, &color, &depth, port)?;
            println!("{}", serde_json::to_string(&record)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_args() {
        let cli = Cli::try_parse_from([
            "vista-bake", "project", "in.jpg", "out.png", "--hfov", "70", "--yaw", "-30",
        ])
        .unwrap();
        match cli.command {
            Command::Project { hfov, yaw, width, .. } => {
                assert_eq!(hfov, 70.0);
                assert_eq!(yaw, -30.0);
                assert_eq!(width, 4096);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_batch_args() {
        let cli = Cli::try_parse_from([
            "vista-bake", "save", "--name", "Cave", "-c", "a.png", "-c", "b.png", "-d", "a_d.png",
            "-d", "b_d.png",
        ])
        .unwrap();
        match cli.command {
            Command::Save { color, depth, port, .. } => {
                assert_eq!(color.len(), 2);
                assert_eq!(depth.len(), 2);
                assert_eq!(port, 4443);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_requires_color() {
        assert!(Cli::try_parse_from(["vista-bake", "save"]).is_err());
    }
}
