use kmeans_stepper::*;

/// Plays the part of a web handler: every "click" posts the same request and asks for one more step.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let request: ClusterRequest<f64> = serde_json::from_str(r#"{
        "points": [[1, 1], [1.5, 2], [3, 4], [5, 7], [3.5, 5], [4.5, 5], [3.5, 4.5]],
        "k": 2,
        "max_iter": 20,
        "init_method": "farthest",
        "seed": 42
    }"#).expect("request is valid JSON");

    let mut session = Session::new();
    loop {
        session.apply(request.clone())?;
        let report = session.step()?;
        println!("{}", serde_json::to_string(&report).expect("reports serialize"));
        if report.phase.is_terminal() {
            break;
        }
    }
    Ok(())
}
