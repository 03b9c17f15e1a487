use std::cell::RefCell;
use std::rc::Rc;
use std::str::from_utf8;

use teller::bin_utils::Service;

const ACCOUNTS_FILE: &str = include_str!("accounts.csv");
const TRANSFERS_FILE: &str = include_str!("transfers.csv");

#[test]
fn replay_transfers() {
    let mut output = Vec::new();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let collected = Rc::clone(&errors);

    let service = Service {
        accounts: ACCOUNTS_FILE.as_bytes(),
        transfers: TRANSFERS_FILE.as_bytes(),
        output: &mut output,
        error_printer: Box::new(move |_line, err| {
            collected.borrow_mut().push(err.to_string());
        }),
    };
    service.run().unwrap();

    // committed 30 from 1 to 2, rolled the 20 back, moved 5 from 2 to 3;
    // the remaining rows were rejected without touching any balance
    assert_eq!(
        from_utf8(&output).unwrap(),
        "id,name,balance\n\
         1,Alice Checking,70\n\
         2,Bob Savings,75\n\
         3,Carol Checking,30\n"
    );

    let errors = errors.borrow();
    assert_eq!(
        *errors,
        vec![
            "Insufficient funds: balance is 25.00, transfer amount is 500.00".to_string(),
            "Source and destination accounts must differ, both are 2".to_string(),
            "No account with id 9".to_string(),
        ]
    );
}
