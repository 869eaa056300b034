#![no_main]

use archgraph_importer::{ClassFileImporter, ClassRecord};
use archgraph_signature::parse_class_signature;
use archgraph_types::TypeUsage;
use libfuzzer_sys::fuzz_target;

mod utils;

const OWNER: &str = "fuzz.Target";

// Runs a class signature through the whole per-class pipeline. A class either imports with its
// type parameters or degrades to an empty list with exactly one diagnostic; walking the result
// (rendering, erasure through self-referential bounds) must terminate.
fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let classes = ClassFileImporter::new().import_classes([
        ClassRecord::interface("java/lang/Comparable"),
        ClassRecord::class(OWNER).with_signature(text),
    ]);
    let class = classes.get(OWNER).expect("imported class is registered");
    assert!(!class.is_stub());

    if class.diagnostics().is_empty() {
        let parsed = parse_class_signature(text).expect("imported signature parses");
        assert_eq!(class.type_parameters().len(), parsed.type_params.len());
        for param in class.type_parameters() {
            assert!(!param.bounds().is_empty());
            let _ = param.to_signature(&classes);
            for bound in param.bounds() {
                let erased = bound.erasure(&classes);
                assert!(matches!(erased, TypeUsage::Class(_) | TypeUsage::Array(_)));
            }
        }
    } else {
        assert_eq!(class.diagnostics().len(), 1);
        assert!(class.type_parameters().is_empty());
    }
});
