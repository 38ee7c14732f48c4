#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("norm_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use lknorm_engine::export::{SvgOptions, curve_to_svg, file_stem, write_obj};
    use lknorm_engine::geom::{
        BoundarySurface, DEFAULT_CURVE_POINTS, DEFAULT_SPHERE_RESOLUTION, GeomContext, GeomMesh,
        sample_boundary_2d,
    };
    use lknorm_engine::norm::lk_norm;
    use std::fs::{self, File};
    use std::io::BufWriter;
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"norm_cli (lknorm-engine)

USAGE:
  norm_cli norm <k> <v1> [v2 ...]
  norm_cli curve --k <k> [options]
  norm_cli surface --k <k> [options]

  <k> is a positive number or `inf`.

OPTIONS (curve):
  --points <n>       Number of boundary samples (default 360)
  --svg <path>       Write the curve as SVG
  --width <px>       SVG width (default 600)
  --height <px>      SVG height (default 600)

OPTIONS (surface):
  --resolution <r>   Sphere subdivision level (default 40)
  --obj <path>       Write the surface as OBJ

COMMON:
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "norm" => cmd_norm(&mut args),
            "curve" => cmd_curve(&mut args),
            "surface" => cmd_surface(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_norm(args: &mut Args) -> Result<(), String> {
        let k = parse_k(&args.value("<k>")?)?;
        let mut vector = Vec::new();
        while let Some(arg) = args.next() {
            vector.push(parse_number("component", &arg)?);
        }
        if vector.is_empty() {
            return Err("missing vector components".to_string());
        }
        println!("{}", lk_norm(&vector, k));
        Ok(())
    }

    fn cmd_curve(args: &mut Args) -> Result<(), String> {
        let mut k: Option<f64> = None;
        let mut points = DEFAULT_CURVE_POINTS;
        let mut svg_path: Option<PathBuf> = None;
        let mut options = SvgOptions::default();
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--k" => k = Some(parse_k(&args.value("--k")?)?),
                "--points" => points = parse_count("--points", &args.value("--points")?)?,
                "--svg" => svg_path = Some(PathBuf::from(args.value("--svg")?)),
                "--width" => options.width = parse_number("--width", &args.value("--width")?)?,
                "--height" => options.height = parse_number("--height", &args.value("--height")?)?,
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        let k = k.ok_or("missing --k")?;

        let curve = sample_boundary_2d(k, points).map_err(|e| e.to_string())?;
        eprintln!(
            "L{} curve: points={} convex={}",
            curve.k().label(),
            curve.len(),
            curve.is_convex(1e-12)
        );

        match svg_path {
            Some(path) => {
                let svg = curve_to_svg(&curve, &options).map_err(|e| e.to_string())?;
                write_text_file(&path, &svg, overwrite)?;
                eprintln!("wrote {} ({}.svg)", path.display(), file_stem(curve.k()));
            }
            None => {
                for p in curve.points() {
                    println!("{} {}", p.x, p.y);
                }
            }
        }
        Ok(())
    }

    fn cmd_surface(args: &mut Args) -> Result<(), String> {
        let mut k: Option<f64> = None;
        let mut resolution = DEFAULT_SPHERE_RESOLUTION;
        let mut obj_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--k" => k = Some(parse_k(&args.value("--k")?)?),
                "--resolution" => resolution = parse_count("--resolution", &args.value("--resolution")?)?,
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        let k = k.ok_or("missing --k")?;

        let mut ctx = GeomContext::new();
        let surface = BoundarySurface::with_context(k, resolution, &mut ctx).map_err(|e| e.to_string())?;
        let mesh_diag = surface.diagnostics();

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, surface.mesh(), &file_stem(surface.k()), overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!(
            "L{} surface r={}: vertices={} triangles={} | {}",
            surface.k().label(),
            surface.resolution(),
            surface.mesh().vertex_count(),
            surface.mesh().triangle_count(),
            mesh_diag.summary()
        );
        if let Some(timing) = mesh_diag.timing.as_ref() {
            eprintln!("timing: {:.3} ms", timing.total_ms());
        }
        Ok(())
    }

    fn parse_k(raw: &str) -> Result<f64, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inf" | "infinity" | "∞" => Ok(f64::INFINITY),
            other => parse_number("k", other),
        }
    }

    fn parse_number(what: &str, raw: &str) -> Result<f64, String> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {what} `{raw}`: {e}"))
    }

    fn parse_count(flag: &str, raw: &str) -> Result<usize, String> {
        raw.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid value for {flag} `{raw}`: {e}"))
    }

    fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;
        fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, name: &str, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;
        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        write_obj(mesh, name, BufWriter::new(file)).map_err(|e| format!("write obj: {e}"))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
