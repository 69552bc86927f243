use kmeans_stepper::*;
use rand::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let (sample_cnt, k, max_iter) = (300, 4, 100);

    // Scatter some random points across a 640x480 plot area
    let mut rnd = StdRng::seed_from_u64(1337);
    let mut samples = Vec::with_capacity(sample_cnt * 2);
    for _ in 0..sample_cnt {
        samples.push(rnd.gen_range(0.0f64..640.0));
        samples.push(rnd.gen_range(0.0f64..480.0));
    }

    // Calculate kmeans, using kmean++ as initialization-method
    let data = Dataset::new(samples, sample_cnt, 2)?;
    let config = KMeansConfig::build().random_generator(rnd).build();
    let mut kmean = KMeans::new(data, k, max_iter, InitMethod::KMeansPlusPlus, config)?;
    let result = kmean.run_to_convergence()?;

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster-Assignments: {:?}", result.assignments);
    println!("{:?} after {} iterations, error: {:?}", result.phase, result.iterations, result.distsum);
    Ok(())
}
