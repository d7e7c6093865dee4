use geojson_wfst::{
    ActionsInput, FeatureInput, Params, delete, insert, replace, transaction, update,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: geojson_to_wfst <insert|update|delete|replace|transaction> \
                     <features.geojson> [params.json]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("geojson_to_wfst failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let action = args.next().ok_or(USAGE)?;
    let input_path = args.next().ok_or(USAGE)?;
    let params = match args.next() {
        Some(path) => Params::from_json(&std::fs::read_to_string(path)?)?,
        None => Params::default(),
    };

    let input = std::fs::read_to_string(&input_path)?;
    let actions = match action.as_str() {
        "transaction" => ActionsInput::from_json_str(&input)?,
        "insert" => insert(FeatureInput::from_json_str(&input)?, &params)?.into(),
        "update" => update(FeatureInput::from_json_str(&input)?, &params)?.into(),
        "delete" => delete(FeatureInput::from_json_str(&input)?, &params)?.into(),
        "replace" => replace(FeatureInput::from_json_str(&input)?, &params)?.into(),
        other => return Err(format!("unknown action '{other}'\n{USAGE}").into()),
    };

    println!("{}", transaction(actions, &params)?);
    Ok(())
}
