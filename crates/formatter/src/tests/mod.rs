mod legacy_payloads;
