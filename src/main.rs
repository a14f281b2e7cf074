use std::{
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{Context, Result};
use byteplot::{
    source::DEFAULT_CACHE_THRESHOLD,
    window::{DEFAULT_BRIGHTNESS, DEFAULT_WINDOW_LENGTH, MAX_BRIGHTNESS},
    CachePolicy, ChannelCaps, ColorBuffer, ImageSink, Visualizer,
};
use clap::{arg, command, value_parser, ArgMatches};
use log::{error, info, LevelFilter};
use macroquad::{
    prelude::{
        clear_background, draw_text, draw_texture_ex, is_key_down, is_key_pressed, next_frame,
        screen_height, screen_width, vec2, DrawTextureParams, FilterMode, KeyCode, Texture2D,
        BLACK, WHITE,
    },
    window::Conf,
};

const SCALE: i32 = 3;
const STATUS_HEIGHT: i32 = 28;

fn config(title: String) -> Conf {
    Conf {
        window_title: title,
        window_width: 256 * SCALE,
        window_height: 256 * SCALE + STATUS_HEIGHT,
        ..Default::default()
    }
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    let [red, green, blue] = ChannelCaps::default().max();
    let matches = command!()
        .args([
            arg!(-c --color <RRGGBB>)
                .help(format!(
                    "Maximum red, green and blue intensity in hex (default: {red:02X}{green:02X}{blue:02X})"
                ))
                .required(false)
                .global(true)
                .value_parser(value_parser!(ChannelCaps)),
            arg!(-r --cache <POLICY>)
                .help(format!(
                    "Cache files below this many bytes, or `force` / `never` (default: {DEFAULT_CACHE_THRESHOLD})"
                ))
                .required(false)
                .global(true)
                .value_parser(value_parser!(CachePolicy)),
        ])
        .subcommands([
            command!("show").alias("s").args([
                arg!(<FILE> "The input file")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
                arg!(--snapshot <PNG> "Where the S key saves the plot (default: <FILE>.png)")
                    .required(false)
                    .value_parser(value_parser!(PathBuf)),
            ]),
            command!("snapshot").alias("p").args([
                arg!(<FILE> "The input file")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
                arg!(<OUTPUT> "The PNG file to write")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
                arg!(--offset <BYTES> "First byte of the window (default: 0)")
                    .required(false)
                    .value_parser(value_parser!(u64)),
                arg!(--length <BYTES>)
                    .help(format!(
                        "Number of byte pairs in the window (default: {DEFAULT_WINDOW_LENGTH})"
                    ))
                    .required(false)
                    .value_parser(value_parser!(u64)),
                arg!(--brightness <LEVEL>)
                    .help(format!(
                        "Brightness from 1 to {MAX_BRIGHTNESS} (default: {DEFAULT_BRIGHTNESS})"
                    ))
                    .required(false)
                    .value_parser(value_parser!(u32)),
            ]),
        ])
        .subcommand_required(true)
        .get_matches();
    match matches.subcommand() {
        Some(("show", args)) => {
            let file = args.get_one::<PathBuf>("FILE").unwrap();
            let snapshot = args
                .get_one::<PathBuf>("snapshot")
                .cloned()
                .unwrap_or_else(|| default_snapshot(file));
            let visualizer = open(file, args);
            let title = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            macroquad::Window::from_config(config(title), window(visualizer, snapshot));
        }
        Some(("snapshot", args)) => {
            let file = args.get_one::<PathBuf>("FILE").unwrap();
            let visualizer = open(file, args);
            if let Err(err) = snapshot(visualizer, args) {
                error!("{err:#}");
                exit(1);
            }
        }
        _ => unreachable!(),
    }
}

fn open(file: &Path, args: &ArgMatches) -> Visualizer {
    let caps = args.get_one::<ChannelCaps>("color").copied().unwrap_or_default();
    let policy = args.get_one::<CachePolicy>("cache").copied().unwrap_or_default();
    if !file.exists() || !file.is_file() {
        error!("Input does not exist or is not a file");
        exit(1);
    }
    match Visualizer::open(file, caps, policy) {
        Ok(visualizer) => visualizer,
        Err(err) => {
            error!("Could not open {} - {err}", file.display());
            exit(1);
        }
    }
}

fn default_snapshot(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".png");
    PathBuf::from(name)
}

fn snapshot(mut visualizer: Visualizer, args: &ArgMatches) -> Result<()> {
    // Length first, the valid offsets depend on it.
    if let Some(&length) = args.get_one::<u64>("length") {
        visualizer.set_window_length(length);
    }
    if let Some(&offset) = args.get_one::<u64>("offset") {
        visualizer.set_offset(offset);
    }
    if let Some(&brightness) = args.get_one::<u32>("brightness") {
        visualizer.set_brightness(brightness);
    }
    let output = args.get_one::<PathBuf>("OUTPUT").unwrap();
    visualizer
        .save_image(output)
        .with_context(|| format!("Could not save plot to {}", output.display()))?;
    let window = visualizer.window();
    info!(
        "Saved {} pairs from offset {} to {}",
        window.window_length(),
        window.offset(),
        output.display()
    );
    Ok(())
}

/// Shows the latest plot as a texture scaled to the window.
#[derive(Default)]
struct Screen {
    texture: Option<Texture2D>,
}

impl ImageSink for Screen {
    fn present(&mut self, image: &ColorBuffer) -> byteplot::Result {
        let texture = Texture2D::from_rgba8(256, 256, image.as_rgba());
        texture.set_filter(FilterMode::Nearest);
        self.texture = Some(texture);
        Ok(())
    }
}

impl Screen {
    fn draw(&self) {
        let Some(texture) = &self.texture else {
            return;
        };
        let side = screen_width().min(screen_height() - STATUS_HEIGHT as f32);
        draw_texture_ex(
            texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(side, side)),
                ..Default::default()
            },
        );
    }
}

async fn window(mut visualizer: Visualizer, snapshot: PathBuf) {
    let mut screen = Screen::default();
    let mut dirty = true;
    loop {
        dirty |= handle_input(&mut visualizer);
        if is_key_pressed(KeyCode::S) {
            match visualizer.save_image(&snapshot) {
                Ok(()) => info!("Saved plot to {}", snapshot.display()),
                Err(err) => error!("Could not save plot - {err}"),
            }
        }
        if dirty {
            // Keep the previous texture if the redraw fails.
            if let Err(err) = visualizer.present(&mut screen) {
                error!("Could not redraw - {err}");
            }
            dirty = false;
        }
        clear_background(BLACK);
        screen.draw();
        draw_status(&visualizer);
        next_frame().await
    }
}

fn handle_input(visualizer: &mut Visualizer) -> bool {
    let window = *visualizer.window();
    let step = if is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift) {
        window.window_length()
    } else {
        (window.window_length() / 16).max(1)
    };
    let mut changed = false;
    if is_key_down(KeyCode::Down) {
        changed |= visualizer.set_offset(window.offset().saturating_add(step));
    }
    if is_key_down(KeyCode::Up) {
        changed |= visualizer.set_offset(window.offset().saturating_sub(step));
    }
    if is_key_pressed(KeyCode::Home) {
        changed |= visualizer.set_offset(0);
    }
    if is_key_pressed(KeyCode::End) {
        changed |= visualizer.set_offset(u64::MAX);
    }
    if is_key_pressed(KeyCode::Right) {
        changed |= visualizer.set_window_length(window.window_length().saturating_mul(2));
    }
    if is_key_pressed(KeyCode::Left) {
        changed |= visualizer.set_window_length(window.window_length() / 2);
    }
    if is_key_down(KeyCode::Equal) {
        changed |= visualizer.set_brightness(window.brightness() + 1);
    }
    if is_key_down(KeyCode::Minus) {
        changed |= visualizer.set_brightness(window.brightness().saturating_sub(1));
    }
    changed
}

fn draw_status(visualizer: &Visualizer) {
    let window = visualizer.window();
    let status = format!(
        "off {}/{}  len {}/{}  bri {}/{}{}",
        window.offset(),
        window.max_offset(),
        window.window_length(),
        window.max_window_length(),
        window.brightness(),
        window.max_brightness(),
        if visualizer.is_cached() { "" } else { "  (streaming)" },
    );
    draw_text(&status, 6.0, screen_height() - 9.0, 20.0, WHITE);
}
