use crate::{
    dataset::Dataset,
    error::{ConfigError, Result},
    memory::*,
};

/// Check caller-placed centroids against **data**: exactly **k** of them, each finite and of the dataset's dimension.
pub(crate) fn validate<T: Primitive>(data: &Dataset<T>, k: usize, computed: &[Vec<T>]) -> std::result::Result<(), ConfigError> {
    if computed.len() != k {
        return Err(ConfigError::ManualCentroidCount { expected: k, found: computed.len() });
    }
    for (index, c) in computed.iter().enumerate() {
        if c.len() != data.dims() {
            return Err(ConfigError::ManualCentroidDimension { index, expected: data.dims(), found: c.len() });
        }
        if c.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteCoordinate { index });
        }
    }
    Ok(())
}

#[inline(always)]
pub(crate) fn calculate<T: Primitive>(data: &Dataset<T>, k: usize, computed: &[Vec<T>]) -> Result<Vec<T>> {
    validate(data, k, computed)?;
    Ok(computed.iter().flat_map(|c| c.iter().cloned()).collect())
}
