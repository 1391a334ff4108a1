mod dump;
mod scene;

use psxgs::{sim::SimulatedGpu, *};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scene {
    /// Flat and gouraud polygons.
    Shapes,
    /// Lines and poly-lines.
    Lines,
    /// Plain, flipped, scaled and rotated sprites.
    Sprites,
}

#[derive(Parser)]
#[command(version, about = "Build a frame and show what the coprocessor receives", long_about = None)]
struct Args {
    /// Flush through the data port instead of DMA.
    #[arg(short, long)]
    pio: bool,

    /// Wait for drawing to finish after the flush.
    #[arg(short, long)]
    autowait: bool,

    #[arg(short, long, value_enum, default_value_t = Scene::Shapes)]
    scene: Scene,

    /// Size of the ordering table, in words.
    #[arg(short, long, default_value_t = 4096)]
    list_words: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let flags = if args.pio { InitFlags::NO_BIOS } else { InitFlags::empty() };
    let mut list = vec![0; args.list_words];
    let mut gs = Gs::with_poll(SimulatedGpu::new(), YieldSpin, &mut list);
    gs.init(GsConfig { flags, autowait: args.autowait });
    if let Err(e) = gs.set_video_mode(&VideoMode::new(320, 240, VideoStandard::NTSC)) {
        eprintln!("video mode: {}", e);
        std::process::exit(1);
    }
    gs.bus().take_packets();

    let result = scene::build(&mut gs, args.scene)
        .and_then(|_| {
            log::info!("sorted {} words", gs.list_position());
            gs.draw_list()
        });
    if let Err(e) = result {
        eprintln!("frame failed: {}", e);
        std::process::exit(1);
    }

    let packets = gs.bus().take_packets();
    dump::print_packets(&packets);
}
