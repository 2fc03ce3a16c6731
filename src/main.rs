fn main() {
    pypkgs::run_cli();
}
