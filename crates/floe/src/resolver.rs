/// A source for this instance's worker id.
///
/// The generator treats the id as an opaque integer: where it comes from —
/// static configuration, an environment variable, a hash of the hostname, a
/// coordination service — is the caller's concern, which is why this is a
/// seam rather than a constructor argument. Resolvers are invoked exactly
/// once, during construction; the resolved value is validated against the
/// configured worker-id width and then fixed for the generator's lifetime.
///
/// Any `Fn() -> u64` closure is a resolver:
///
/// ```
/// use floe::{GeneratorConfig, LockFlakeGenerator};
///
/// let generator = LockFlakeGenerator::new(|| 7, GeneratorConfig::default()).unwrap();
/// assert_eq!(generator.worker_id(), 7);
/// ```
pub trait WorkerIdResolver {
    /// Returns the worker id to embed in every identifier.
    fn resolve(&self) -> u64;
}

impl<F> WorkerIdResolver for F
where
    F: Fn() -> u64,
{
    fn resolve(&self) -> u64 {
        self()
    }
}

/// A resolver returning a worker id known ahead of time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedWorkerId(pub u64);

impl WorkerIdResolver for FixedWorkerId {
    fn resolve(&self) -> u64 {
        self.0
    }
}
