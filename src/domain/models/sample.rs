/// Solidity transfer with a state update after the external call (reentrancy).
pub const SAMPLE_SNIPPET: &str = r#"function transfer(address to, uint amount) public {
  require(balances[msg.sender] >= amount);
  balances[msg.sender] -= amount;
  (bool success, ) = to.call{value: amount}("");
  require(success);
  balances[to] += amount;
}"#;
