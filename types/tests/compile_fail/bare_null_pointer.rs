use notnull_types::NotNull;

fn main() {
    let _app: NotNull<*const u8> = std::ptr::null();
}
