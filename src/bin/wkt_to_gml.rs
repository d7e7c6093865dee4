use geojson_wfst::{Geometry, GmlOptions, geometry_to_gml};

fn main() {
    if let Err(err) = run() {
        eprintln!("wkt_to_gml failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let wkt = args.next().ok_or("Usage: wkt_to_gml <wkt> [srsName]")?;
    let options = GmlOptions {
        srs_name: args.next(),
        ..Default::default()
    };

    let geometry = Geometry::from_wkt(&wkt)?;
    println!("{}", geometry_to_gml(&geometry, "", &options)?);
    Ok(())
}
