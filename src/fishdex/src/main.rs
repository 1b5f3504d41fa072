fn main() -> anyhow::Result<()> {
    fishdex_cli::main()
}
