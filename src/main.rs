fn main() -> Result<(), anyhow::Error> {
    oepipe::run()
}
