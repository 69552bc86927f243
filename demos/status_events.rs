use kmeans_stepper::*;
use rand::prelude::*;

fn main() -> Result<()> {
    let (sample_cnt, sample_dims, k, max_iter) = (500, 2, 6, 250);

    // Generate some random data in [-1, 1)²
    let mut rnd = StdRng::seed_from_u64(7);
    let data = Dataset::random_uniform(sample_cnt, sample_dims, -1.0f64, 1.0, &mut rnd)?;

	let conf = KMeansConfig::<f64>::build()
		.random_generator(rnd)
		.convergence(ConvergenceCriterion::Tolerance { epsilon: 1e-6 })
		.init_done(&|s| println!("Initialization completed: {:?}", s.centroid_points()))
		.iteration_done(&|s, nr, new_distsum|
			println!("Iteration {} - Error: {:.4} -> {:.4} | Improvement: {:.4}",
				nr, s.distsum, new_distsum, s.distsum - new_distsum))
		.build();

    let mut kmean = KMeans::new(data, k, max_iter, InitMethod::FarthestFirst, conf)?;
    let result = kmean.run_to_convergence()?;

    println!("Centroids: {:?}", result.centroids);
    println!("{:?} after {} iterations", result.phase, result.iterations);
    Ok(())
}
