mod test_answer_without_offer_is_ignored;
mod test_initiator_flow;
mod test_responder_flow;
