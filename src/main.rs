fn main() -> anyhow::Result<()> {
    envwatch_lib::run()
}
