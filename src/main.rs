fn main() {
    medibot::run()
}
