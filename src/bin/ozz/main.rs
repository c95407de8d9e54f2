//! ozz-cli - Tool for inspecting and converting ozz archives.

use std::env;
use std::path::Path;

use ozz_archive::animation::{Animation, FloatTrack, Skeleton, NO_PARENT};
use ozz_archive::io::{Endianness, FileStream, IArchive, OArchive};
use ozz_archive::offline::{RawAnimation, RawFloatTrack, RawSkeleton};
use ozz_archive::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    // Parse global flags
    let mut log_level = "info";
    let mut endianness = Endianness::native();
    let mut json_mode = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args {
        if let Some(level) = arg.strip_prefix("--log_level=") {
            log_level = match level {
                "silent" => "off",
                "standard" => "info",
                "verbose" => "debug",
                _ => fail(format!("invalid log level '{level}', expected silent|standard|verbose")),
            };
        } else if let Some(name) = arg.strip_prefix("--endian=") {
            endianness = Endianness::from_name(name)
                .unwrap_or_else(|| fail(format!("invalid endianness '{name}', expected native|little|big")));
        } else if arg == "--json" || arg == "-j" {
            json_mode = true;
        } else {
            filtered_args.push(arg);
        }
    }

    init_logging(log_level);

    let result = match filtered_args.as_slice() {
        [] | ["h" | "help" | "-h" | "--help", ..] => {
            print_help();
            Ok(())
        }
        ["--version" | "-V", ..] => {
            println!(
                "ozz-cli {} (built {} {})",
                env!("CARGO_PKG_VERSION"),
                env!("OZZ_BUILD_DATE"),
                env!("OZZ_BUILD_TIME")
            );
            Ok(())
        }
        ["i" | "info", file] => cmd_info(file, json_mode),
        ["c" | "convert", input, output] => cmd_convert(input, output, endianness),
        ["i" | "info", ..] => Err(Error::other("Usage: ozz-cli info <file> [--json]")),
        ["c" | "convert", ..] => {
            Err(Error::other("Usage: ozz-cli convert <in> <out> [--endian=native|little|big]"))
        }
        [command, ..] => Err(Error::other(format!("unknown command '{command}', see 'ozz-cli help'"))),
    };

    if let Err(e) = result {
        fail(e);
    }
}

/// Prints a diagnostic line and exits with a failure code.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_help() {
    println!("ozz-cli - ozz archive toolkit");
    println!();
    println!("USAGE:");
    println!("    ozz-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>          Identify the archived object and print a summary");
    println!("    c, convert <in> <out>      Re-encode an archive with another endianness");
    println!("    h, help                    Show this help");
    println!();
    println!("OPTIONS:");
    println!("    --log_level=<level>        silent, standard (default) or verbose");
    println!("    --endian=<endianness>      native (default), little or big");
    println!("    -j, --json                 Print the info summary as JSON");
    println!("    -V, --version              Show version and build date");
    println!();
    println!("EXAMPLES:");
    println!("    ozz-cli info skeleton.ozz");
    println!("    ozz-cli info animation.ozz --json");
    println!("    ozz-cli convert skeleton.ozz skeleton_be.ozz --endian=big");
}

/// Any object ozz-cli can identify in an archive.
enum Object {
    Skeleton(Skeleton),
    Animation(Animation),
    FloatTrack(FloatTrack),
    RawSkeleton(RawSkeleton),
    RawAnimation(RawAnimation),
    RawFloatTrack(RawFloatTrack),
}

impl Object {
    /// Identifies the next object from its tag, then loads it.
    /// Unsupported versions and truncated archives are reported as errors.
    fn read(archive: &mut IArchive<'_>) -> Result<Self> {
        let object = if archive.test_tag::<Skeleton>() {
            Self::Skeleton(archive.try_read()?)
        } else if archive.test_tag::<Animation>() {
            Self::Animation(archive.try_read()?)
        } else if archive.test_tag::<FloatTrack>() {
            Self::FloatTrack(archive.try_read()?)
        } else if archive.test_tag::<RawSkeleton>() {
            Self::RawSkeleton(archive.try_read()?)
        } else if archive.test_tag::<RawAnimation>() {
            Self::RawAnimation(archive.try_read()?)
        } else if archive.test_tag::<RawFloatTrack>() {
            Self::RawFloatTrack(archive.try_read()?)
        } else {
            return Err(Error::other("archive does not start with a known object tag"));
        };
        Ok(object)
    }

    fn write(&self, archive: &mut OArchive<'_>) {
        match self {
            Self::Skeleton(o) => archive.write(o),
            Self::Animation(o) => archive.write(o),
            Self::FloatTrack(o) => archive.write(o),
            Self::RawSkeleton(o) => archive.write(o),
            Self::RawAnimation(o) => archive.write(o),
            Self::RawFloatTrack(o) => archive.write(o),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Skeleton(_) => "skeleton",
            Self::Animation(_) => "animation",
            Self::FloatTrack(_) => "float_track",
            Self::RawSkeleton(_) => "raw_skeleton",
            Self::RawAnimation(_) => "raw_animation",
            Self::RawFloatTrack(_) => "raw_float_track",
        }
    }

    fn summary(&self) -> Value {
        match self {
            Self::Skeleton(s) => {
                let joints: Vec<Value> = s
                    .joint_names()
                    .iter()
                    .zip(s.joint_properties())
                    .map(|(name, p)| {
                        let parent = (p.parent != NO_PARENT).then_some(p.parent);
                        json!({ "name": name, "parent": parent, "leaf": p.is_leaf })
                    })
                    .collect();
                json!({
                    "num_joints": s.num_joints(),
                    "num_soa_joints": s.num_soa_joints(),
                    "joints": joints,
                })
            }
            Self::Animation(a) => json!({
                "duration": a.duration(),
                "num_tracks": a.num_tracks(),
                "translations": a.translations().len(),
                "rotations": a.rotations().len(),
                "scales": a.scales().len(),
            }),
            Self::FloatTrack(t) => json!({
                "num_keys": t.num_keys(),
            }),
            Self::RawSkeleton(s) => json!({
                "num_joints": s.num_joints(),
                "roots": s.roots.iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
                "valid": s.validate().is_ok(),
            }),
            Self::RawAnimation(a) => json!({
                "duration": a.duration,
                "num_tracks": a.num_tracks(),
                "valid": a.validate().is_ok(),
            }),
            Self::RawFloatTrack(t) => json!({
                "num_keyframes": t.keyframes.len(),
                "valid": t.validate().is_ok(),
            }),
        }
    }
}

fn open(path: &str) -> Result<FileStream> {
    debug!("Opening {path}");
    FileStream::try_open(Path::new(path))
}

fn cmd_info(path: &str, json_mode: bool) -> Result<()> {
    let mut stream = open(path)?;
    let mut archive = IArchive::new(&mut stream);
    let endianness = archive.endianness();
    let object = Object::read(&mut archive)?;

    if json_mode {
        let out = json!({
            "file": path,
            "endianness": endianness.name(),
            "type": object.kind(),
            "summary": object.summary(),
        });
        let text = serde_json::to_string_pretty(&out).map_err(|e| Error::other(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    println!("File:       {path}");
    println!("Endianness: {}", endianness.name());
    println!("Type:       {}", object.kind());
    if let Value::Object(fields) = object.summary() {
        for (key, value) in fields {
            match value {
                Value::Array(items) => {
                    println!("{key}:");
                    for item in items {
                        println!("    {item}");
                    }
                }
                value => println!("{key}: {value}"),
            }
        }
    }
    Ok(())
}

fn cmd_convert(input: &str, output: &str, endianness: Endianness) -> Result<()> {
    let mut src = open(input)?;
    let object = Object::read(&mut IArchive::new(&mut src))?;

    let mut dst = FileStream::try_create(Path::new(output))?;
    let mut archive = OArchive::new(&mut dst, endianness);
    object.write(&mut archive);
    if archive.truncated() {
        return Err(Error::other(format!("failed to write {output}: output is truncated")));
    }
    dst.close()?;

    info!(
        "Converted {} from {input} to {output} ({} endian).",
        object.kind(),
        endianness.name()
    );
    Ok(())
}
