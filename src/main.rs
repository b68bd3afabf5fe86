fn main() {
    heliosinger_lib::run()
}
