use notnull_types::not_null;

fn main() {
    let _app = not_null!(std::ptr::null::<u8>());
}
