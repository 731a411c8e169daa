pub mod books;

use owl_kernel::ModuleRegistry;

/// Register every module of the service with the registry
pub fn register_all(registry: &mut ModuleRegistry) -> anyhow::Result<()> {
    registry.register(books::create_module(books::store::BookStore::new()))?;
    Ok(())
}
