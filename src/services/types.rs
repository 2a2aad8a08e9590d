use futures::Future;
use futures_cpupool::CpuPool;

use super::error::Error;

pub type ServiceFuture<T> = Box<Future<Item = T, Error = Error> + Send>;

pub fn spawn_on_pool<T, Func>(cpu_pool: &CpuPool, f: Func) -> ServiceFuture<T>
where
    T: Send + 'static,
    Func: FnOnce() -> Result<T, Error> + Send + 'static,
{
    Box::new(cpu_pool.spawn_fn(f))
}
