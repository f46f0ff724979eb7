//! List operation - every interface declared in a package.

use mwgen_reflect::GoModule;

use crate::reports::ListReport;

/// Collect the interfaces of `module` in traversal order.
pub fn list(module: &GoModule) -> ListReport {
    ListReport {
        dir: module.dir().to_path_buf(),
        import_path: module.import_path().map(str::to_string),
        interfaces: module.interfaces(),
    }
}
