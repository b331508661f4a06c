fn main() -> anyhow::Result<()> {
    klondike_oracle::run()
}
